//! Serializable rule definitions

use crate::rule::{Rule, RuleContext};
use crate::rules::{
    HasHadMinimumLines, HasHadTreatment, HasHadTreatmentForMinimumMonths,
    HasHadTreatmentWithMinimumCycles, HasOnlyHadSystemicTreatments,
    ProgressedOnTreatmentWithinMonths,
};
use regimen_core::{CoreError, TreatmentPredicate};
use serde::{Deserialize, Serialize};

/// Which rule to build, and its parameters
///
/// Tagged by `rule` in configuration. Predicates are validated on load, so a
/// definition that deserializes always names a discriminating predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum RuleDefinition {
    /// At least `threshold` distinct systemic lines
    HasHadMinimumLines {
        /// Minimum number of lines
        threshold: usize,
    },

    /// Any entry matches the predicate
    HasHadTreatment {
        /// Treatment searched for
        predicate: TreatmentPredicate,
    },

    /// Every systemic entry matches the predicate
    HasOnlyHadSystemicTreatments {
        /// Treatment every systemic entry must match
        predicate: TreatmentPredicate,
    },

    /// Progression on a matching treatment within `months` of the reference date
    ProgressedOnTreatmentWithinMonths {
        /// Treatment progressed on
        predicate: TreatmentPredicate,
        /// Window length in months
        months: u32,
    },

    /// A matching treatment given for at least `min_cycles` cycles
    HasHadTreatmentWithMinimumCycles {
        /// Treatment searched for
        predicate: TreatmentPredicate,
        /// Minimum number of cycles
        min_cycles: u32,
    },

    /// A matching treatment given for at least `months` months
    HasHadTreatmentForMinimumMonths {
        /// Treatment searched for
        predicate: TreatmentPredicate,
        /// Minimum duration in months
        months: u32,
    },
}

impl RuleDefinition {
    /// Configuration name of the rule kind
    pub fn kind(&self) -> &'static str {
        match self {
            RuleDefinition::HasHadMinimumLines { .. } => "has_had_minimum_lines",
            RuleDefinition::HasHadTreatment { .. } => "has_had_treatment",
            RuleDefinition::HasOnlyHadSystemicTreatments { .. } => {
                "has_only_had_systemic_treatments"
            }
            RuleDefinition::ProgressedOnTreatmentWithinMonths { .. } => {
                "progressed_on_treatment_within_months"
            }
            RuleDefinition::HasHadTreatmentWithMinimumCycles { .. } => {
                "has_had_treatment_with_minimum_cycles"
            }
            RuleDefinition::HasHadTreatmentForMinimumMonths { .. } => {
                "has_had_treatment_for_minimum_months"
            }
        }
    }

    /// Build the rule
    ///
    /// # Errors
    /// Returns `CoreError::InvalidThreshold` for a zero threshold, cycle count
    /// or month count
    pub fn build(&self, context: &RuleContext) -> Result<Box<dyn Rule>, CoreError> {
        let rule: Box<dyn Rule> = match self {
            RuleDefinition::HasHadMinimumLines { threshold } => {
                positive("threshold", *threshold as u64)?;
                Box::new(HasHadMinimumLines::new(*threshold))
            }
            RuleDefinition::HasHadTreatment { predicate } => Box::new(HasHadTreatment::new(
                predicate.clone(),
                context.classifier.clone(),
            )),
            RuleDefinition::HasOnlyHadSystemicTreatments { predicate } => Box::new(
                HasOnlyHadSystemicTreatments::new(predicate.clone()),
            ),
            RuleDefinition::ProgressedOnTreatmentWithinMonths { predicate, months } => {
                positive("months", u64::from(*months))?;
                Box::new(ProgressedOnTreatmentWithinMonths::new(
                    predicate.clone(),
                    *months,
                    context,
                ))
            }
            RuleDefinition::HasHadTreatmentWithMinimumCycles {
                predicate,
                min_cycles,
            } => {
                positive("min_cycles", u64::from(*min_cycles))?;
                Box::new(HasHadTreatmentWithMinimumCycles::new(
                    predicate.clone(),
                    *min_cycles,
                    context.classifier.clone(),
                ))
            }
            RuleDefinition::HasHadTreatmentForMinimumMonths { predicate, months } => {
                positive("months", u64::from(*months))?;
                Box::new(HasHadTreatmentForMinimumMonths::new(
                    predicate.clone(),
                    *months,
                    context,
                ))
            }
        };
        Ok(rule)
    }
}

fn positive(field: &str, value: u64) -> Result<(), CoreError> {
    if value == 0 {
        return Err(CoreError::InvalidThreshold(format!(
            "{} must be at least 1",
            field
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use regimen_domain::{PartialDate, TreatmentCategory};

    fn context() -> RuleContext {
        RuleContext::new(PartialDate::year_month(2024, 6), Default::default())
    }

    #[test]
    fn test_kind_matches_serialized_tag() {
        let definition = RuleDefinition::HasHadTreatmentWithMinimumCycles {
            predicate: TreatmentPredicate::category(TreatmentCategory::Chemotherapy),
            min_cycles: 4,
        };
        let json = serde_json::to_value(&definition).unwrap();
        assert_eq!(json["rule"], definition.kind());

        let rule = definition.build(&context()).unwrap();
        assert_eq!(rule.kind(), definition.kind());
    }

    #[test]
    fn test_zero_threshold_is_rejected() {
        let definition = RuleDefinition::HasHadMinimumLines { threshold: 0 };
        assert!(matches!(
            definition.build(&context()),
            Err(CoreError::InvalidThreshold(_))
        ));

        let definition = RuleDefinition::ProgressedOnTreatmentWithinMonths {
            predicate: TreatmentPredicate::category(TreatmentCategory::Chemotherapy),
            months: 0,
        };
        assert!(definition.build(&context()).is_err());
    }
}
