use crate::rule::Rule;
use crate::rules::{describe, treatment_verdict};
use regimen_core::{
    fold_all, fold_any, EntryVerdict, Evaluation, EvaluationResult, TreatmentPredicate,
    TrialClassifier,
};
use regimen_domain::TreatmentHistoryEntry;
use tracing::debug;

/// Passes when any entry involved a matching treatment
#[derive(Debug, Clone)]
pub struct HasHadTreatment {
    predicate: TreatmentPredicate,
    classifier: TrialClassifier,
}

impl HasHadTreatment {
    /// Create the rule
    pub fn new(predicate: TreatmentPredicate, classifier: TrialClassifier) -> Self {
        Self {
            predicate,
            classifier,
        }
    }
}

impl Rule for HasHadTreatment {
    fn kind(&self) -> &'static str {
        "has_had_treatment"
    }

    fn evaluate(&self, history: &[TreatmentHistoryEntry]) -> Evaluation {
        let verdicts: Vec<(EntryVerdict, &TreatmentHistoryEntry)> = history
            .iter()
            .map(|entry| (treatment_verdict(&self.predicate, &self.classifier, entry), entry))
            .collect();
        let result = fold_any(verdicts.iter().map(|(v, _)| *v));
        let with = |wanted: EntryVerdict| {
            describe(verdicts.iter().filter(|(v, _)| *v == wanted).map(|(_, e)| *e))
        };

        let message = match result {
            EvaluationResult::Pass => format!(
                "Has had {}: {}",
                self.predicate,
                with(EntryVerdict::Match)
            ),
            EvaluationResult::Warn => format!(
                "Has had {} only by generic drug type: {}",
                self.predicate,
                with(EntryVerdict::ApproximateMatch)
            ),
            EvaluationResult::Undetermined => format!(
                "Undetermined whether {} was given: {}",
                self.predicate,
                with(EntryVerdict::PossibleMatch)
            ),
            _ => format!("Has not had {}", self.predicate),
        };
        debug!("{}: {}", self.kind(), message);
        Evaluation::new(result, message)
    }
}

/// Passes when every systemic entry involved only matching systemic treatments
///
/// A history without any systemic entry passes vacuously. Undisclosed trial
/// entries may or may not have been systemic and make the result at most
/// UNDETERMINED.
#[derive(Debug, Clone)]
pub struct HasOnlyHadSystemicTreatments {
    predicate: TreatmentPredicate,
}

impl HasOnlyHadSystemicTreatments {
    /// Create the rule
    pub fn new(predicate: TreatmentPredicate) -> Self {
        Self { predicate }
    }

    fn verdict(&self, entry: &TreatmentHistoryEntry) -> Option<EntryVerdict> {
        if entry.is_trial && entry.treatments.is_empty() {
            return Some(EntryVerdict::PossibleMatch);
        }

        let grade = entry
            .all_treatments()
            .into_iter()
            .filter(|t| t.is_systemic)
            .map(|t| self.predicate.classify(t))
            .min()?;
        Some(grade.verdict())
    }
}

impl Rule for HasOnlyHadSystemicTreatments {
    fn kind(&self) -> &'static str {
        "has_only_had_systemic_treatments"
    }

    fn evaluate(&self, history: &[TreatmentHistoryEntry]) -> Evaluation {
        let verdicts: Vec<(EntryVerdict, &TreatmentHistoryEntry)> = history
            .iter()
            .filter_map(|entry| self.verdict(entry).map(|v| (v, entry)))
            .collect();
        let result = fold_all(verdicts.iter().map(|(v, _)| *v));

        let message = match result {
            EvaluationResult::Pass => {
                format!("All {} systemic entries were {}", verdicts.len(), self.predicate)
            }
            EvaluationResult::Warn => format!(
                "All systemic entries were {}, some only by generic drug type",
                self.predicate
            ),
            EvaluationResult::Undetermined => format!(
                "Undetermined whether all systemic entries were {}: {}",
                self.predicate,
                describe(
                    verdicts
                        .iter()
                        .filter(|(v, _)| *v == EntryVerdict::PossibleMatch)
                        .map(|(_, e)| *e)
                )
            ),
            _ => format!(
                "Systemic entries other than {}: {}",
                self.predicate,
                describe(
                    verdicts
                        .iter()
                        .filter(|(v, _)| *v == EntryVerdict::NoMatch)
                        .map(|(_, e)| *e)
                )
            ),
        };
        Evaluation::new(result, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::fixtures::*;
    use regimen_domain::{DrugType, PartialDate, Treatment, TreatmentCategory};

    fn platinum() -> TreatmentPredicate {
        TreatmentPredicate::category_with_types(
            TreatmentCategory::Chemotherapy,
            [DrugType::PlatinumCompound],
        )
    }

    fn has_had(predicate: TreatmentPredicate) -> HasHadTreatment {
        HasHadTreatment::new(predicate, TrialClassifier::default())
    }

    #[test]
    fn test_definite_match_passes() {
        let history = vec![
            course(paclitaxel(), PartialDate::year(2019)),
            course(carboplatin(), PartialDate::year(2020)),
        ];
        let evaluation = has_had(platinum()).evaluate(&history);
        assert_eq!(evaluation.result, EvaluationResult::Pass);
        assert!(evaluation.messages[0].contains("CARBOPLATIN"));
    }

    #[test]
    fn test_undisclosed_trial_is_undetermined() {
        let history = vec![
            course(paclitaxel(), PartialDate::year(2019)),
            TreatmentHistoryEntry::undisclosed_trial(Some("KEYNOTE-789".to_string())),
        ];
        assert_eq!(
            has_had(platinum()).evaluate(&history).result,
            EvaluationResult::Undetermined
        );
    }

    #[test]
    fn test_disclosed_trial_arm_is_judged_as_given() {
        let history = vec![course(paclitaxel(), PartialDate::year(2021))
            .with_trial(Some("IMPOWER-131".to_string()))];
        assert_eq!(has_had(platinum()).evaluate(&history).result, EvaluationResult::Fail);
    }

    #[test]
    fn test_trial_never_hides_implausible_category() {
        let history = vec![TreatmentHistoryEntry::undisclosed_trial(None)];
        let surgery = TreatmentPredicate::category(TreatmentCategory::Surgery);
        assert_eq!(has_had(surgery).evaluate(&history).result, EvaluationResult::Fail);
    }

    #[test]
    fn test_missing_drug_types_are_undetermined() {
        let history = vec![course(
            Treatment::new("DOUBLET", TreatmentCategory::Chemotherapy),
            PartialDate::year(2020),
        )];
        assert_eq!(
            has_had(platinum()).evaluate(&history).result,
            EvaluationResult::Undetermined
        );
    }

    #[test]
    fn test_generic_type_warns() {
        let history = vec![course(
            Treatment::new("CHECKPOINT INHIBITOR", TreatmentCategory::Immunotherapy)
                .with_type(DrugType::ImmuneCheckpointInhibitor),
            PartialDate::year(2022),
        )];
        let anti_pd1 = TreatmentPredicate::category_with_types(
            TreatmentCategory::Immunotherapy,
            [DrugType::AntiPd1],
        );
        assert_eq!(has_had(anti_pd1).evaluate(&history).result, EvaluationResult::Warn);
    }

    #[test]
    fn test_empty_history_fails() {
        assert_eq!(has_had(platinum()).evaluate(&[]).result, EvaluationResult::Fail);
    }

    #[test]
    fn test_only_had_chemotherapy() {
        let rule = HasOnlyHadSystemicTreatments::new(TreatmentPredicate::category(
            TreatmentCategory::Chemotherapy,
        ));
        let chemo_only = vec![
            course(carboplatin(), PartialDate::year(2019)),
            course(
                Treatment::new("RESECTION", TreatmentCategory::Surgery),
                PartialDate::year(2020),
            ),
            course(paclitaxel(), PartialDate::year(2021)),
        ];
        assert_eq!(rule.evaluate(&chemo_only).result, EvaluationResult::Pass);

        let mut mixed = chemo_only.clone();
        mixed.push(course(pembrolizumab(), PartialDate::year(2022)));
        assert_eq!(rule.evaluate(&mixed).result, EvaluationResult::Fail);

        let mut with_trial = chemo_only;
        with_trial.push(TreatmentHistoryEntry::undisclosed_trial(None));
        assert_eq!(rule.evaluate(&with_trial).result, EvaluationResult::Undetermined);
    }

    #[test]
    fn test_only_had_is_vacuous_without_systemic_entries() {
        let rule = HasOnlyHadSystemicTreatments::new(TreatmentPredicate::category(
            TreatmentCategory::Immunotherapy,
        ));
        assert_eq!(rule.evaluate(&[]).result, EvaluationResult::Pass);
    }
}
