//! Error types for rule construction and lookup

use regimen_core::CoreError;
use thiserror::Error;

/// Errors that can occur while building or querying the rule registry
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RulesError {
    /// No rule registered under this name
    #[error("Unknown rule: {0}")]
    UnknownRule(String),

    /// Two rules registered under the same name
    #[error("Duplicate rule name: {0}")]
    DuplicateRule(String),

    /// A rule definition that cannot discriminate patients
    #[error("Invalid rule '{name}': {source}")]
    InvalidRule {
        /// Registered rule name
        name: String,
        /// Underlying construction fault
        #[source]
        source: CoreError,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
