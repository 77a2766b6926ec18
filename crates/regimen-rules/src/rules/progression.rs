use crate::rule::{Rule, RuleContext};
use crate::rules::{describe, treatment_verdict};
use regimen_core::{
    fold_any, month_span, project_runs, EntryVerdict, Evaluation, EvaluationResult,
    TreatmentPredicate, TrialClassifier,
};
use regimen_domain::{PartialDate, StopReason, TreatmentHistoryEntry, TreatmentResponse};
use tracing::trace;

/// Passes when the patient progressed on a matching treatment within the
/// last `months` months
///
/// Only the matching portion of a multi-stage course is considered, so a stop
/// reason recorded for the end of a course never attaches to an earlier stage.
#[derive(Debug, Clone)]
pub struct ProgressedOnTreatmentWithinMonths {
    predicate: TreatmentPredicate,
    months: u32,
    reference_date: PartialDate,
    classifier: TrialClassifier,
}

impl ProgressedOnTreatmentWithinMonths {
    /// Create the rule
    pub fn new(predicate: TreatmentPredicate, months: u32, context: &RuleContext) -> Self {
        Self {
            predicate,
            months,
            reference_date: context.reference_date,
            classifier: context.classifier.clone(),
        }
    }

    fn verdict(&self, entry: &TreatmentHistoryEntry) -> EntryVerdict {
        let grade = treatment_verdict(&self.predicate, &self.classifier, entry);
        if grade == EntryVerdict::NoMatch {
            return grade;
        }

        let portions = project_runs(entry, |t| self.predicate.may_match(t));
        let outcome = if portions.is_empty() {
            self.progression_verdict(entry)
        } else {
            portions
                .iter()
                .map(|portion| self.progression_verdict(portion))
                .max()
                .unwrap_or(EntryVerdict::PossibleMatch)
        };

        grade.min(outcome)
    }

    fn progression_verdict(&self, portion: &TreatmentHistoryEntry) -> EntryVerdict {
        let progressed = progressed(portion);
        let within = self.within_window(portion);
        trace!(
            "'{}': progressed {:?}, within window {:?}",
            portion.treatment_display(),
            progressed,
            within
        );

        match (progressed, within) {
            (Some(false), _) | (_, Some(false)) => EntryVerdict::NoMatch,
            (Some(true), Some(true)) => EntryVerdict::Match,
            _ => EntryVerdict::PossibleMatch,
        }
    }

    /// Whether the course ended within the window
    ///
    /// With no stop date, a start inside the window is enough; a start
    /// outside it decides nothing.
    fn within_window(&self, portion: &TreatmentHistoryEntry) -> Option<bool> {
        let months = i64::from(self.months);

        if let Some(stop) = portion.stop() {
            let span = month_span(&stop, &self.reference_date)?;
            return if span.is_at_most(months) {
                Some(true)
            } else if span.min > months {
                Some(false)
            } else {
                None
            };
        }

        let span = month_span(&portion.start?, &self.reference_date)?;
        span.is_at_most(months).then_some(true)
    }
}

fn progressed(portion: &TreatmentHistoryEntry) -> Option<bool> {
    if portion.stop_reason() == Some(StopReason::ProgressiveDisease)
        || portion.best_response() == Some(TreatmentResponse::ProgressiveDisease)
    {
        Some(true)
    } else if portion.stop_reason().is_some() {
        Some(false)
    } else {
        None
    }
}

impl Rule for ProgressedOnTreatmentWithinMonths {
    fn kind(&self) -> &'static str {
        "progressed_on_treatment_within_months"
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
            EvaluationResult::Pass => format!(
                "Progressed on {} within {} months: {}",
                self.predicate,
                self.months,
                with(EntryVerdict::Match)
            ),
            EvaluationResult::Warn => format!(
                "Progressed within {} months on a treatment matching {} only by generic drug type: {}",
                self.months,
                self.predicate,
                with(EntryVerdict::ApproximateMatch)
            ),
            EvaluationResult::Undetermined => format!(
                "Undetermined whether progressed on {} within {} months: {}",
                self.predicate,
                self.months,
                with(EntryVerdict::PossibleMatch)
            ),
            _ => format!(
                "No progression on {} within {} months",
                self.predicate, self.months
            ),
        };
        Evaluation::new(result, message)
    }
}
