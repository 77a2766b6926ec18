//! Regimen Rules
//!
//! Named eligibility rules built from configuration on top of the reasoning
//! core.
//!
//! # Overview
//!
//! The rules layer is responsible for:
//! - **Configuration**: loading core policies and rule definitions from TOML
//! - **Construction**: rejecting rules that cannot discriminate patients before
//!   any evaluation runs
//! - **Evaluation**: running one rule or every rule against a history
//! - **Skipping**: disabled rules answer NOT_EVALUATED instead of guessing
//!
//! ## Rules
//!
//! | Rule | Built on | Fold |
//! |------|----------|------|
//! | `has_had_minimum_lines` | line counter | threshold on `[min, max]` |
//! | `has_had_treatment` | predicate, trial classifier | any |
//! | `has_only_had_systemic_treatments` | predicate | all |
//! | `progressed_on_treatment_within_months` | projector, month span | any |
//! | `has_had_treatment_with_minimum_cycles` | projector | any |
//! | `has_had_treatment_for_minimum_months` | temporal resolver | any |
//!
//! # Configuration
//!
//! ```toml
//! reference_date = { year = 2024, month = 6 }
//!
//! [core]
//! stop_date_policy = "recorded_only"
//! implausible_trial_categories = ["SURGERY", "TRANSPLANTATION", "ABLATION", "SUPPORTIVE_TREATMENT"]
//!
//! [[rules]]
//! name = "progressed_on_platinum"
//! rule = "progressed_on_treatment_within_months"
//! months = 6
//! predicate = { categories = ["CHEMOTHERAPY"], types = ["PLATINUM_COMPOUND"] }
//!
//! [[rules]]
//! name = "two_prior_lines"
//! rule = "has_had_minimum_lines"
//! threshold = 2
//! enabled = false
//! ```
//!
//! # Usage
//!
//! ```
//! use regimen_core::EvaluationResult;
//! use regimen_rules::RuleRegistry;
//!
//! let registry = RuleRegistry::from_toml(r#"
//!     reference_date = { year = 2024, month = 6 }
//!
//!     [[rules]]
//!     name = "two_prior_lines"
//!     rule = "has_had_minimum_lines"
//!     threshold = 2
//! "#).unwrap();
//!
//! let report = registry.evaluate_all(&[]);
//! assert_eq!(report.result("two_prior_lines"), Some(EvaluationResult::Fail));
//! println!("{}", report.summary());
//! ```

#![warn(missing_docs)]

mod config;
mod definition;
mod error;
mod registry;
mod report;
mod rule;
pub mod rules;

pub use config::{RuleEntry, RulesConfig};
pub use definition::RuleDefinition;
pub use error::RulesError;
pub use registry::RuleRegistry;
pub use report::EvaluationReport;
pub use rule::{Rule, RuleContext};
