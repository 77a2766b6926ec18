use crate::rule::Rule;
use regimen_core::{Evaluation, EvaluationResult, LineBounds};
use regimen_domain::TreatmentHistoryEntry;

/// Passes when the patient has had at least `threshold` systemic lines
#[derive(Debug, Clone)]
pub struct HasHadMinimumLines {
    threshold: usize,
}

impl HasHadMinimumLines {
    /// Create the rule
    pub fn new(threshold: usize) -> Self {
        Self { threshold }
    }
}

impl Rule for HasHadMinimumLines {
    fn kind(&self) -> &'static str {
        "has_had_minimum_lines"
    }

    fn evaluate(&self, history: &[TreatmentHistoryEntry]) -> Evaluation {
        let bounds = LineBounds::systemic(history);
        let result = bounds.evaluate_threshold(self.threshold);

        let message = match result {
            EvaluationResult::Pass => format!(
                "Has had at least {} systemic lines ({} to {})",
                self.threshold, bounds.min, bounds.max
            ),
            EvaluationResult::Fail => format!(
                "Has had at most {} systemic lines, fewer than {}",
                bounds.max, self.threshold
            ),
            _ => format!(
                "Undetermined whether at least {} systemic lines: between {} and {}",
                self.threshold, bounds.min, bounds.max
            ),
        };
        Evaluation::new(result, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::fixtures::*;
    use regimen_domain::{PartialDate, Treatment, TreatmentCategory};

    #[test]
    fn test_overlapping_courses_are_undetermined() {
        let history = vec![
            course(carboplatin(), PartialDate::year(2021)),
            course(carboplatin(), PartialDate::year_month(2021, 5)),
        ];
        let rule = HasHadMinimumLines::new(2);
        assert_eq!(rule.evaluate(&history).result, EvaluationResult::Undetermined);
        assert_eq!(HasHadMinimumLines::new(1).evaluate(&history).result, EvaluationResult::Pass);
        assert_eq!(HasHadMinimumLines::new(3).evaluate(&history).result, EvaluationResult::Fail);
    }

    #[test]
    fn test_non_systemic_entries_do_not_count() {
        let history = vec![
            course(
                Treatment::new("RESECTION", TreatmentCategory::Surgery),
                PartialDate::year_month(2019, 1),
            ),
            course(paclitaxel(), PartialDate::year_month(2020, 1)),
        ];
        let evaluation = HasHadMinimumLines::new(2).evaluate(&history);
        assert_eq!(evaluation.result, EvaluationResult::Fail);
        assert!(evaluation.messages[0].contains("at most 1"));
    }

    #[test]
    fn test_empty_history_fails() {
        assert_eq!(HasHadMinimumLines::new(1).evaluate(&[]).result, EvaluationResult::Fail);
    }
}
