//! Core error types
//!
//! Missing clinical data is never an error here; it flows through as a value
//! and ends up as UNDETERMINED. These errors are configuration faults that must
//! surface when a rule or config is built, not per patient.

use thiserror::Error;

/// Errors that can occur while configuring the reasoning core
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// A predicate was built without any discriminating criterion
    #[error("Predicate has no discriminating criterion (categories, drug types or names)")]
    EmptyPredicate,

    /// A threshold outside its meaningful range
    #[error("Invalid threshold: {0}")]
    InvalidThreshold(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
