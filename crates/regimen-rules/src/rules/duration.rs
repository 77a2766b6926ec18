use crate::rule::{Rule, RuleContext};
use crate::rules::{describe, treatment_verdict};
use regimen_core::{
    fold_any, month_span, next_chronological_entry, project_runs, resolve_stop_date, CoreConfig,
    EntryVerdict, Evaluation, EvaluationResult, TreatmentPredicate, TrialClassifier,
};
use regimen_domain::partial_date::months_between_with_policy;
use regimen_domain::TreatmentHistoryEntry;
use tracing::trace;

/// Passes when a matching treatment lasted at least `months` months
///
/// A stop date inferred from the next entry is an upper bound: it can prove a
/// course too short, but a long enough inferred duration only WARNs. The same
/// holds for durations that needed an unknown month resolved by policy.
#[derive(Debug, Clone)]
pub struct HasHadTreatmentForMinimumMonths {
    predicate: TreatmentPredicate,
    months: u32,
    config: CoreConfig,
    classifier: TrialClassifier,
}

impl HasHadTreatmentForMinimumMonths {
    /// Create the rule
    pub fn new(predicate: TreatmentPredicate, months: u32, context: &RuleContext) -> Self {
        Self {
            predicate,
            months,
            config: context.config.clone(),
            classifier: context.classifier.clone(),
        }
    }

    fn verdict(
        &self,
        entry: &TreatmentHistoryEntry,
        history: &[TreatmentHistoryEntry],
    ) -> EntryVerdict {
        let grade = treatment_verdict(&self.predicate, &self.classifier, entry);
        if grade == EntryVerdict::NoMatch {
            return grade;
        }

        let portions = project_runs(entry, |t| self.predicate.may_match(t));
        let certainty = if portions.is_empty() {
            self.duration_verdict(entry, history)
        } else {
            portions
                .iter()
                .map(|portion| self.duration_verdict(portion, history))
                .max()
                .unwrap_or(EntryVerdict::PossibleMatch)
        };

        grade.min(certainty)
    }

    /// How surely `portion` lasted long enough, ignoring what it contained
    ///
    /// A stop date is only inferred from an entry starting provably after the
    /// portion itself. A stop that provably precedes the start decides nothing.
    fn duration_verdict(
        &self,
        portion: &TreatmentHistoryEntry,
        history: &[TreatmentHistoryEntry],
    ) -> EntryVerdict {
        let Some(start) = portion.start else {
            return EntryVerdict::PossibleMatch;
        };

        let resolution = resolve_stop_date(portion, next_chronological_entry(history, portion));
        let policy = self.config.stop_date_policy;
        let Some(stop) = resolution.effective(policy) else {
            return EntryVerdict::PossibleMatch;
        };
        let Some(span) = month_span(&start, &stop) else {
            return EntryVerdict::PossibleMatch;
        };
        trace!(
            "'{}' lasted {} to {} months (stop inferred: {})",
            portion.treatment_display(),
            span.min,
            span.max,
            resolution.is_inferred(policy)
        );

        let months = i64::from(self.months);
        if span.max < months {
            return EntryVerdict::NoMatch;
        }

        let certainty = if span.is_at_least(months) {
            EntryVerdict::Match
        } else {
            let approximated = self.config.unknown_month_policy.and_then(|month_policy| {
                months_between_with_policy(&start, month_policy, &stop, month_policy)
            });
            match approximated {
                Some(m) if m >= months => EntryVerdict::ApproximateMatch,
                _ => EntryVerdict::PossibleMatch,
            }
        };
        if resolution.is_inferred(policy) {
            certainty.min(EntryVerdict::ApproximateMatch)
        } else {
            certainty
        }
    }
}

impl Rule for HasHadTreatmentForMinimumMonths {
    fn kind(&self) -> &'static str {
        "has_had_treatment_for_minimum_months"
    }

    fn evaluate(&self, history: &[TreatmentHistoryEntry]) -> Evaluation {
        let verdicts: Vec<(EntryVerdict, &TreatmentHistoryEntry)> = history
            .iter()
            .map(|entry| (self.verdict(entry, history), entry))
            .collect();
        let result = fold_any(verdicts.iter().map(|(v, _)| *v));
        let with = |wanted: EntryVerdict| {
            describe(verdicts.iter().filter(|(v, _)| *v == wanted).map(|(_, e)| *e))
        };

        match result {
            EvaluationResult::Pass => Evaluation::pass(format!(
                "Has had {} for at least {} months: {}",
                self.predicate,
                self.months,
                with(EntryVerdict::Match)
            )),
            EvaluationResult::Warn => Evaluation::warn(format!(
                "Has had {} for at least {} months, based on approximated dates: {}",
                self.predicate,
                self.months,
                with(EntryVerdict::ApproximateMatch)
            )),
            EvaluationResult::Undetermined => Evaluation::undetermined(format!(
                "Undetermined whether {} was given for at least {} months: {}",
                self.predicate,
                self.months,
                with(EntryVerdict::PossibleMatch)
            )),
            _ => Evaluation::fail(format!(
                "Has not had {} for at least {} months",
                self.predicate, self.months
            )),
        }
    }
}
