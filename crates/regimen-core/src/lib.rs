//! Regimen Core
//!
//! Shared reasoning primitives for evaluating a patient's treatment history
//! against clinical-trial eligibility criteria.
//!
//! The core provides:
//! - **Temporal resolution**: comparing and reconciling partially known dates
//! - **Line counting**: `[min, max]` bounds on distinct treatment lines
//! - **Stage projection**: the portion of a multi-stage course matching a predicate
//! - **Trial classification**: whether an undisclosed trial arm could match
//! - **Result algebra**: folding per-entry verdicts into one of five results
//!
//! Every operation is a pure function over immutable values. Missing data is
//! carried through as a value and surfaces as UNDETERMINED, never as FAIL.
//!
//! # Examples
//!
//! ```
//! use regimen_core::{LineBounds, EvaluationResult};
//! use regimen_domain::{PartialDate, Treatment, TreatmentCategory, TreatmentHistoryEntry};
//!
//! let course = |start| {
//!     TreatmentHistoryEntry::new(vec![Treatment::new("X", TreatmentCategory::Chemotherapy)])
//!         .with_start(start)
//! };
//! let history = vec![course(PartialDate::year(2021)), course(PartialDate::year_month(2021, 5))];
//!
//! let bounds = LineBounds::of(&history);
//! assert_eq!((bounds.min, bounds.max), (1, 2));
//! assert_eq!(bounds.evaluate_threshold(2), EvaluationResult::Undetermined);
//! ```

#![warn(missing_docs)]

mod config;
mod error;
pub mod evaluation;
pub mod lines;
pub mod predicate;
pub mod projector;
pub mod temporal;
pub mod trial;

pub use config::CoreConfig;
pub use error::CoreError;
pub use evaluation::{fold_all, fold_any, EntryVerdict, Evaluation, EvaluationResult, VerdictTally};
pub use lines::{max_lines, min_lines, LineBounds};
pub use predicate::{PredicateDefinition, PredicateMatch, TreatmentPredicate};
pub use projector::{matching_stages, project, project_runs, StageKind, StageView};
pub use temporal::{
    month_span, next_chronological_entry, resolve_stop_date, treatment_duration, MonthSpan,
    StopDatePolicy, StopDateResolution,
};
pub use trial::{TrialClassifier, DEFAULT_IMPLAUSIBLE_TRIAL_CATEGORIES};
