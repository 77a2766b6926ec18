//! Regimen Domain Layer
//!
//! This crate holds the treatment-history model consumed by the eligibility
//! reasoning core. It depends on nothing but `serde`, so curated histories can
//! be loaded from documents, and defines the value objects every other layer
//! works with.
//!
//! ## Key Concepts
//!
//! - **PartialDate**: a year and month, either of which may be unknown
//! - **Treatment**: a named therapy with categories, drug types and a systemic flag
//! - **TreatmentStage**: one phase of a multi-phase course
//! - **TreatmentHistoryEntry**: one course, possibly with switch-to and maintenance stages
//!
//! ## Architecture
//!
//! - Pure value objects only, no I/O
//! - Absence of data is a value (`Option`), never a sentinel
//! - Entries are immutable once built; reasoning lives in `regimen-core`

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod entry;
pub mod partial_date;
pub mod treatment;

// Re-exports for convenience
pub use entry::{
    Intent, StopReason, TreatmentHistoryDetails, TreatmentHistoryEntry, TreatmentResponse,
    TreatmentStage,
};
pub use partial_date::{DateOrdering, PartialDate, UnknownMonthPolicy, YearMonth};
pub use treatment::{Drug, DrugType, Treatment, TreatmentCategory};
