//! Rule capability interface

use crate::RulesConfig;
use regimen_core::{CoreConfig, Evaluation, TrialClassifier};
use regimen_domain::{PartialDate, TreatmentHistoryEntry};

/// An eligibility rule over a patient's treatment history
///
/// Rules are pure: the same history always yields the same evaluation.
pub trait Rule: Send + Sync {
    /// Kind of rule, as written in configuration
    fn kind(&self) -> &'static str;

    /// Evaluate the rule against a full history
    fn evaluate(&self, history: &[TreatmentHistoryEntry]) -> Evaluation;
}

/// Shared, read-only inputs every rule is built with
#[derive(Debug, Clone)]
pub struct RuleContext {
    /// Date "now" for time windows
    pub reference_date: PartialDate,
    /// Core policies
    pub config: CoreConfig,
    /// Trial classifier built from `config`
    pub classifier: TrialClassifier,
}

impl RuleContext {
    /// Create a context from core policies
    pub fn new(reference_date: PartialDate, config: CoreConfig) -> Self {
        let classifier = TrialClassifier::from_config(&config);
        Self {
            reference_date,
            config,
            classifier,
        }
    }

    /// Create a context from a rules configuration
    pub fn from_config(config: &RulesConfig) -> Self {
        Self::new(config.reference_date, config.core.clone())
    }
}
