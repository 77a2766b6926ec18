//! Rule registry
//!
//! Holds named rules built from configuration and evaluates them against a
//! treatment history. Disabled rules stay registered and answer NOT_EVALUATED.

use crate::rule::{Rule, RuleContext};
use crate::{EvaluationReport, RulesConfig, RulesError};
use regimen_core::Evaluation;
use regimen_domain::TreatmentHistoryEntry;
use std::collections::BTreeMap;
use tracing::{debug, info};

struct RegisteredRule {
    rule: Box<dyn Rule>,
    enabled: bool,
}

/// Named eligibility rules
///
/// # Examples
///
/// ```
/// use regimen_core::EvaluationResult;
/// use regimen_domain::{PartialDate, Treatment, TreatmentCategory, TreatmentHistoryEntry};
/// use regimen_rules::RuleRegistry;
///
/// let registry = RuleRegistry::from_toml(r#"
///     reference_date = { year = 2024, month = 6 }
///
///     [[rules]]
///     name = "prior_immunotherapy"
///     rule = "has_had_treatment"
///     predicate = { categories = ["IMMUNOTHERAPY"] }
/// "#).unwrap();
///
/// let history = vec![TreatmentHistoryEntry::new(vec![Treatment::new(
///     "NIVOLUMAB",
///     TreatmentCategory::Immunotherapy,
/// )])
/// .with_start(PartialDate::year(2022))];
///
/// let evaluation = registry.evaluate("prior_immunotherapy", &history).unwrap();
/// assert_eq!(evaluation.result, EvaluationResult::Pass);
/// ```
#[derive(Default)]
pub struct RuleRegistry {
    rules: BTreeMap<String, RegisteredRule>,
}

impl RuleRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Build every rule named in the configuration
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid or any rule cannot be
    /// built
    pub fn from_config(config: &RulesConfig) -> Result<Self, RulesError> {
        config.validate()?;
        let context = RuleContext::from_config(config);

        let mut registry = Self::new();
        for entry in &config.rules {
            let rule = entry
                .definition
                .build(&context)
                .map_err(|source| RulesError::InvalidRule {
                    name: entry.name.clone(),
                    source,
                })?;
            registry.register(entry.name.clone(), rule, entry.enabled)?;
        }

        info!(
            "Registered {} rules ({} disabled), reference date {}",
            registry.len(),
            config.rules.iter().filter(|e| !e.enabled).count(),
            config.reference_date
        );
        Ok(registry)
    }

    /// Load configuration from TOML and build every rule
    pub fn from_toml(toml_str: &str) -> Result<Self, RulesError> {
        Self::from_config(&RulesConfig::from_toml(toml_str)?)
    }

    /// Register a rule under `name`
    ///
    /// # Errors
    /// Returns `RulesError::DuplicateRule` if the name is taken
    pub fn register(
        &mut self,
        name: impl Into<String>,
        rule: Box<dyn Rule>,
        enabled: bool,
    ) -> Result<(), RulesError> {
        let name = name.into();
        if self.rules.contains_key(&name) {
            return Err(RulesError::DuplicateRule(name));
        }
        debug!("Registered rule '{}' ({})", name, rule.kind());
        self.rules.insert(name, RegisteredRule { rule, enabled });
        Ok(())
    }

    /// Registered rule names, in order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    /// Whether a rule is registered under `name`
    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    /// Number of registered rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Evaluate one rule
    ///
    /// # Errors
    /// Returns `RulesError::UnknownRule` if nothing is registered under `name`
    pub fn evaluate(
        &self,
        name: &str,
        history: &[TreatmentHistoryEntry],
    ) -> Result<Evaluation, RulesError> {
        let registered = self
            .rules
            .get(name)
            .ok_or_else(|| RulesError::UnknownRule(name.to_string()))?;
        Ok(Self::run(name, registered, history))
    }

    /// Evaluate every registered rule
    pub fn evaluate_all(&self, history: &[TreatmentHistoryEntry]) -> EvaluationReport {
        let mut report = EvaluationReport::new();
        for (name, registered) in &self.rules {
            report.record(name.clone(), Self::run(name, registered, history));
        }
        report
    }

    fn run(
        name: &str,
        registered: &RegisteredRule,
        history: &[TreatmentHistoryEntry],
    ) -> Evaluation {
        if !registered.enabled {
            debug!("Rule '{}' is disabled", name);
            return Evaluation::not_evaluated(format!("Rule '{}' is disabled", name));
        }

        let evaluation = registered.rule.evaluate(history);
        debug!(
            "Rule '{}' ({}) over {} entries: {}",
            name,
            registered.rule.kind(),
            history.len(),
            evaluation.result
        );
        evaluation
    }
}
