//! Configuration for the rule registry
//!
//! One TOML document carries the core policies, the evaluation reference date
//! and the list of registered rules.

use crate::{RuleDefinition, RulesError};
use regimen_core::CoreConfig;
use regimen_domain::PartialDate;
use serde::{Deserialize, Serialize};

/// A named, optionally disabled rule definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleEntry {
    /// Name the rule is registered and queried under
    pub name: String,

    /// Disabled rules are registered but answer NOT_EVALUATED
    /// Default: true
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Which rule, and its parameters
    #[serde(flatten)]
    pub definition: RuleDefinition,
}

fn default_enabled() -> bool {
    true
}

impl RuleEntry {
    /// Create an enabled entry
    pub fn new(name: impl Into<String>, definition: RuleDefinition) -> Self {
        Self {
            name: name.into(),
            enabled: true,
            definition,
        }
    }

    /// Mark the entry as disabled
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

/// Configuration for a [`RuleRegistry`](crate::RuleRegistry)
///
/// # Examples
///
/// ```
/// use regimen_rules::RulesConfig;
///
/// let config = RulesConfig::from_toml(r#"
///     reference_date = { year = 2024, month = 6 }
///
///     [[rules]]
///     name = "two_prior_lines"
///     rule = "has_had_minimum_lines"
///     threshold = 2
/// "#).unwrap();
///
/// assert_eq!(config.rules.len(), 1);
/// assert!(config.rules[0].enabled);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RulesConfig {
    /// Date "now" for rules with a time window, usually the screening date
    pub reference_date: PartialDate,

    /// Resolver, trial and approximation policies
    #[serde(default)]
    pub core: CoreConfig,

    /// Registered rules
    #[serde(default)]
    pub rules: Vec<RuleEntry>,
}

impl RulesConfig {
    /// Create a configuration with default core policies and no rules
    pub fn new(reference_date: PartialDate) -> Self {
        Self {
            reference_date,
            core: CoreConfig::default(),
            rules: Vec::new(),
        }
    }

    /// Replace the core policies
    pub fn with_core(mut self, core: CoreConfig) -> Self {
        self.core = core;
        self
    }

    /// Add a rule
    pub fn with_rule(mut self, entry: RuleEntry) -> Self {
        self.rules.push(entry);
        self
    }

    /// Validate the configuration
    ///
    /// # Errors
    /// Returns an error if the reference date has no year, the core policies
    /// are invalid, or two rules share a name
    pub fn validate(&self) -> Result<(), RulesError> {
        if !self.reference_date.has_year() {
            return Err(RulesError::Config(
                "reference_date must have a known year".to_string(),
            ));
        }

        self.core
            .validate()
            .map_err(|e| RulesError::Config(e.to_string()))?;

        let mut seen = std::collections::BTreeSet::new();
        for entry in &self.rules {
            if !seen.insert(entry.name.as_str()) {
                return Err(RulesError::DuplicateRule(entry.name.clone()));
            }
        }

        Ok(())
    }

    /// Load and validate configuration from TOML
    pub fn from_toml(toml_str: &str) -> Result<Self, RulesError> {
        let config: Self =
            toml::from_str(toml_str).map_err(|e| RulesError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}
