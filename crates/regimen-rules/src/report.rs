//! Per-rule results of one evaluation pass

use regimen_core::{Evaluation, EvaluationResult};
use std::collections::BTreeMap;

/// Evaluations of every registered rule against one history, keyed by rule name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EvaluationReport {
    evaluations: BTreeMap<String, Evaluation>,
}

impl EvaluationReport {
    /// Create an empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the evaluation of one rule
    pub fn record(&mut self, name: impl Into<String>, evaluation: Evaluation) {
        self.evaluations.insert(name.into(), evaluation);
    }

    /// Evaluation of a rule, if it was evaluated
    pub fn get(&self, name: &str) -> Option<&Evaluation> {
        self.evaluations.get(name)
    }

    /// Result of a rule, if it was evaluated
    pub fn result(&self, name: &str) -> Option<EvaluationResult> {
        self.get(name).map(|e| e.result)
    }

    /// Evaluations in rule name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Evaluation)> {
        self.evaluations.iter().map(|(name, e)| (name.as_str(), e))
    }

    /// Number of rules with the given result
    pub fn count(&self, result: EvaluationResult) -> usize {
        self.evaluations
            .values()
            .filter(|e| e.result == result)
            .count()
    }

    /// Number of rules in the report
    pub fn len(&self) -> usize {
        self.evaluations.len()
    }

    /// Whether the report is empty
    pub fn is_empty(&self) -> bool {
        self.evaluations.is_empty()
    }

    /// Generate a summary of the report
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Eligibility Report".to_string(),
            "==================".to_string(),
        ];

        for result in [
            EvaluationResult::Pass,
            EvaluationResult::Warn,
            EvaluationResult::Fail,
            EvaluationResult::Undetermined,
            EvaluationResult::NotEvaluated,
        ] {
            let count = self.count(result);
            if count > 0 {
                lines.push(format!("{}: {}", result, count));
            }
        }
        lines.push(String::new());

        for (name, evaluation) in &self.evaluations {
            lines.push(format!("{} [{}]", name, evaluation.result));
            for message in &evaluation.messages {
                lines.push(format!("  {}", message));
            }
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts() {
        let mut report = EvaluationReport::new();
        report.record("a", Evaluation::pass("ok"));
        report.record("b", Evaluation::undetermined("unknown stop reason"));
        report.record("c", Evaluation::pass("ok"));

        assert_eq!(report.len(), 3);
        assert_eq!(report.count(EvaluationResult::Pass), 2);
        assert_eq!(report.count(EvaluationResult::Fail), 0);
        assert_eq!(report.result("b"), Some(EvaluationResult::Undetermined));
        assert_eq!(report.result("d"), None);
    }

    #[test]
    fn test_summary() {
        let mut report = EvaluationReport::new();
        report.record("prior_platinum", Evaluation::warn("generic type only"));
        report.record("lines", Evaluation::not_evaluated("disabled"));

        let summary = report.summary();
        assert!(summary.contains("WARN: 1"));
        assert!(summary.contains("NOT_EVALUATED: 1"));
        assert!(summary.contains("prior_platinum [WARN]"));
        assert!(summary.contains("  generic type only"));
        assert!(!summary.contains("PASS:"));
    }
}
