//! Configuration for the reasoning core
//!
//! Every policy that turns incomplete data into a definite answer is named
//! here, so a call site can only approximate when its config says so.

use crate::temporal::StopDatePolicy;
use crate::trial::DEFAULT_IMPLAUSIBLE_TRIAL_CATEGORIES;
use crate::CoreError;
use regimen_domain::{TreatmentCategory, UnknownMonthPolicy};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Configuration for the reasoning core
///
/// # Examples
///
/// ```
/// use regimen_core::{CoreConfig, StopDatePolicy};
///
/// // Default: recorded data only, no approximations
/// let config = CoreConfig::default();
/// assert_eq!(config.stop_date_policy, StopDatePolicy::RecordedOnly);
/// assert!(config.unknown_month_policy.is_none());
///
/// // Lenient: infer stop dates and resolve unknown months
/// let config = CoreConfig::lenient();
/// assert_eq!(config.stop_date_policy, StopDatePolicy::InferFromNextEntry);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Categories never considered hidden behind an undisclosed trial arm
    #[serde(default = "default_implausible_trial_categories")]
    pub implausible_trial_categories: BTreeSet<TreatmentCategory>,

    /// Whether a missing stop date may be inferred from the next entry
    #[serde(default)]
    pub stop_date_policy: StopDatePolicy,

    /// How to resolve an unknown month when a definite count is unavoidable
    ///
    /// `None` means never; results stay UNDETERMINED instead.
    #[serde(default)]
    pub unknown_month_policy: Option<UnknownMonthPolicy>,
}

fn default_implausible_trial_categories() -> BTreeSet<TreatmentCategory> {
    DEFAULT_IMPLAUSIBLE_TRIAL_CATEGORIES.into_iter().collect()
}

impl Default for CoreConfig {
    /// Strict configuration: recorded data only
    fn default() -> Self {
        Self {
            implausible_trial_categories: default_implausible_trial_categories(),
            stop_date_policy: StopDatePolicy::RecordedOnly,
            unknown_month_policy: None,
        }
    }
}

impl CoreConfig {
    /// Strict preset, same as the default
    pub fn strict() -> Self {
        Self::default()
    }

    /// Lenient preset: infer stop dates from the next entry and resolve
    /// unknown months to the end of the year
    pub fn lenient() -> Self {
        Self {
            implausible_trial_categories: default_implausible_trial_categories(),
            stop_date_policy: StopDatePolicy::InferFromNextEntry,
            unknown_month_policy: Some(UnknownMonthPolicy::EndOfYear),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), CoreError> {
        if TreatmentCategory::ALL
            .iter()
            .all(|c| self.implausible_trial_categories.contains(c))
        {
            return Err(CoreError::Config(
                "implausible_trial_categories cannot cover every category".to_string(),
            ));
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, CoreError> {
        let config: Self = toml::from_str(toml_str)
            .map_err(|e| CoreError::Config(format!("Failed to parse TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, CoreError> {
        toml::to_string_pretty(self)
            .map_err(|e| CoreError::Config(format!("Failed to serialize to TOML: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = CoreConfig::default();
        assert!(config.validate().is_ok());
        assert!(config
            .implausible_trial_categories
            .contains(&TreatmentCategory::Surgery));
    }

    #[test]
    fn test_lenient_config_is_valid() {
        let config = CoreConfig::lenient();
        assert!(config.validate().is_ok());
        assert_eq!(config.unknown_month_policy, Some(UnknownMonthPolicy::EndOfYear));
    }

    #[test]
    fn test_rejects_all_categories_implausible() {
        let config = CoreConfig {
            implausible_trial_categories: TreatmentCategory::ALL.into_iter().collect(),
            ..CoreConfig::default()
        };
        assert!(matches!(config.validate(), Err(CoreError::Config(_))));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = CoreConfig::from_toml(r#"stop_date_policy = "infer_from_next_entry""#).unwrap();
        assert_eq!(config.stop_date_policy, StopDatePolicy::InferFromNextEntry);
        assert_eq!(
            config.implausible_trial_categories,
            CoreConfig::default().implausible_trial_categories
        );
    }

    #[test]
    fn test_toml_round_trip() {
        let config = CoreConfig::lenient();
        let toml_str = config.to_toml().unwrap();
        let parsed = CoreConfig::from_toml(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_invalid_toml() {
        assert!(CoreConfig::from_toml("stop_date_policy = 3").is_err());
    }
}
