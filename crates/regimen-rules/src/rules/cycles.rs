use crate::rule::Rule;
use crate::rules::{describe, treatment_verdict};
use regimen_core::{
    fold_any, matching_stages, EntryVerdict, Evaluation, EvaluationResult,
    TreatmentPredicate, TrialClassifier,
};
use regimen_domain::{Treatment, TreatmentHistoryEntry};

/// Passes when a matching treatment was given for at least `min_cycles` cycles
#[derive(Debug, Clone)]
pub struct HasHadTreatmentWithMinimumCycles {
    predicate: TreatmentPredicate,
    min_cycles: u32,
    classifier: TrialClassifier,
}

impl HasHadTreatmentWithMinimumCycles {
    /// Create the rule
    pub fn new(predicate: TreatmentPredicate, min_cycles: u32, classifier: TrialClassifier) -> Self {
        Self {
            predicate,
            min_cycles,
            classifier,
        }
    }

    fn verdict(&self, entry: &TreatmentHistoryEntry) -> EntryVerdict {
        let grade = treatment_verdict(&self.predicate, &self.classifier, entry);
        if grade == EntryVerdict::NoMatch {
            return grade;
        }

        let runs = cycle_runs(entry, |t| self.predicate.may_match(t));
        if runs.iter().any(|run| run.total >= self.min_cycles) {
            return grade;
        }
        // Separate runs are never summed
        if !runs.is_empty() && runs.iter().all(|run| run.complete) {
            EntryVerdict::NoMatch
        } else {
            EntryVerdict::PossibleMatch
        }
    }
}

/// Cycles recorded over one run of matching stages
#[derive(Debug, Clone, Copy)]
struct CycleRun {
    total: u32,
    /// Every stage of the run has a count; otherwise `total` is a lower bound
    complete: bool,
}

fn cycle_runs<P>(entry: &TreatmentHistoryEntry, predicate: P) -> Vec<CycleRun>
where
    P: Fn(&Treatment) -> bool,
{
    let mut runs = Vec::new();
    let mut current: Option<CycleRun> = None;

    for (stage, matched) in matching_stages(entry, predicate) {
        if !matched {
            runs.extend(current.take());
            continue;
        }
        let run = current.get_or_insert(CycleRun {
            total: 0,
            complete: true,
        });
        match stage.cycles {
            Some(cycles) => run.total = run.total.saturating_add(cycles),
            None => run.complete = false,
        }
    }
    runs.extend(current);
    runs
}

impl Rule for HasHadTreatmentWithMinimumCycles {
    fn kind(&self) -> &'static str {
        "has_had_treatment_with_minimum_cycles"
    }

    fn evaluate(&self, history: &[TreatmentHistoryEntry]) -> Evaluation {
        let verdicts: Vec<(EntryVerdict, &TreatmentHistoryEntry)> = history
            .iter()
            .map(|entry| (self.verdict(entry), entry))
            .collect();
        let result = fold_any(verdicts.iter().map(|(v, _)| *v));
        let with = |wanted: EntryVerdict| {
            describe(verdicts.iter().filter(|(v, _)| *v == wanted).map(|(_, e)| *e))
        };

        let message = match result {
            EvaluationResult::Pass | EvaluationResult::Warn => format!(
                "Has had {} for at least {} cycles: {}",
                self.predicate,
                self.min_cycles,
                with(if result == EvaluationResult::Pass {
                    EntryVerdict::Match
                } else {
                    EntryVerdict::ApproximateMatch
                })
            ),
            EvaluationResult::Undetermined => format!(
                "Undetermined whether {} was given for at least {} cycles: {}",
                self.predicate,
                self.min_cycles,
                with(EntryVerdict::PossibleMatch)
            ),
            _ => format!(
                "Has not had {} for at least {} cycles",
                self.predicate, self.min_cycles
            ),
        };
        Evaluation::new(result, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::fixtures::*;
    use regimen_domain::{PartialDate, TreatmentCategory, TreatmentStage};

    fn rule(min_cycles: u32) -> HasHadTreatmentWithMinimumCycles {
        HasHadTreatmentWithMinimumCycles::new(
            TreatmentPredicate::category(TreatmentCategory::Chemotherapy),
            min_cycles,
            TrialClassifier::default(),
        )
    }

    #[test]
    fn test_cycles_sum_over_matching_stages() {
        let history = vec![course(carboplatin(), PartialDate::year(2020))
            .with_cycles(2)
            .with_switch_to(TreatmentStage::new(paclitaxel()).with_cycles(3))];

        assert_eq!(rule(5).evaluate(&history).result, EvaluationResult::Pass);
        assert_eq!(rule(6).evaluate(&history).result, EvaluationResult::Fail);
    }

    #[test]
    fn test_missing_count_is_undetermined() {
        let history = vec![course(carboplatin(), PartialDate::year(2020))];
        assert_eq!(rule(1).evaluate(&history).result, EvaluationResult::Undetermined);

        let partial = vec![course(carboplatin(), PartialDate::year(2020))
            .with_cycles(2)
            .with_switch_to(TreatmentStage::new(paclitaxel()))];
        assert_eq!(rule(4).evaluate(&partial).result, EvaluationResult::Undetermined);
        assert_eq!(rule(2).evaluate(&partial).result, EvaluationResult::Pass);
    }

    #[test]
    fn test_any_run_may_reach_the_minimum() {
        let history = vec![course(carboplatin(), PartialDate::year(2020))
            .with_cycles(2)
            .with_switch_to(TreatmentStage::new(filgrastim()).with_cycles(1))
            .with_switch_to(TreatmentStage::new(carboplatin()).with_cycles(4))];

        assert_eq!(rule(3).evaluate(&history).result, EvaluationResult::Pass);
        assert_eq!(rule(5).evaluate(&history).result, EvaluationResult::Fail);
    }

    #[test]
    fn test_non_matching_stages_do_not_count() {
        let history = vec![course(carboplatin(), PartialDate::year(2020))
            .with_cycles(2)
            .with_maintenance(TreatmentStage::new(pembrolizumab()).with_cycles(10))];
        assert_eq!(rule(4).evaluate(&history).result, EvaluationResult::Fail);
    }
}
