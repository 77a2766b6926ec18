//! Evaluation result algebra
//!
//! Five result states with no implicit coercion between them. Per-entry
//! verdicts are folded into PASS, WARN, UNDETERMINED or FAIL; NOT_EVALUATED is
//! only ever produced by the rule layer when a rule is intentionally skipped.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::trace;

/// Outcome of evaluating an eligibility criterion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EvaluationResult {
    /// Criterion definitely met
    Pass,
    /// Criterion met, with a caveat
    Warn,
    /// Criterion definitely not met
    Fail,
    /// Data insufficient to decide
    Undetermined,
    /// Criterion intentionally not evaluated
    NotEvaluated,
}

impl EvaluationResult {
    /// Get the result name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            EvaluationResult::Pass => "PASS",
            EvaluationResult::Warn => "WARN",
            EvaluationResult::Fail => "FAIL",
            EvaluationResult::Undetermined => "UNDETERMINED",
            EvaluationResult::NotEvaluated => "NOT_EVALUATED",
        }
    }
}

impl fmt::Display for EvaluationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A result plus the facts a consumer needs to explain it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    /// The result state
    pub result: EvaluationResult,

    /// Explanation fragments, in the order they were added
    pub messages: Vec<String>,
}

impl Evaluation {
    /// Create an evaluation with a single message
    pub fn new(result: EvaluationResult, message: impl Into<String>) -> Self {
        Self {
            result,
            messages: vec![message.into()],
        }
    }

    /// PASS evaluation
    pub fn pass(message: impl Into<String>) -> Self {
        Self::new(EvaluationResult::Pass, message)
    }

    /// WARN evaluation
    pub fn warn(message: impl Into<String>) -> Self {
        Self::new(EvaluationResult::Warn, message)
    }

    /// FAIL evaluation
    pub fn fail(message: impl Into<String>) -> Self {
        Self::new(EvaluationResult::Fail, message)
    }

    /// UNDETERMINED evaluation
    pub fn undetermined(message: impl Into<String>) -> Self {
        Self::new(EvaluationResult::Undetermined, message)
    }

    /// NOT_EVALUATED short-circuit
    pub fn not_evaluated(reason: impl Into<String>) -> Self {
        Self::new(EvaluationResult::NotEvaluated, reason)
    }

    /// Append an explanation fragment
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.messages.push(message.into());
        self
    }
}

/// How one entry relates to the property being checked
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EntryVerdict {
    /// Definitely does not satisfy the property
    NoMatch,
    /// Might satisfy it; data too incomplete to tell
    PossibleMatch,
    /// Satisfies it only through a generic classification
    ApproximateMatch,
    /// Definitely satisfies the property
    Match,
}

/// Count of verdicts per kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VerdictTally {
    /// Definite matches
    pub matches: usize,
    /// Matches through generic classification
    pub approximate: usize,
    /// Possible matches
    pub possible: usize,
    /// Definite non-matches
    pub non_matches: usize,
}

impl VerdictTally {
    /// Record one verdict
    pub fn record(&mut self, verdict: EntryVerdict) {
        match verdict {
            EntryVerdict::Match => self.matches += 1,
            EntryVerdict::ApproximateMatch => self.approximate += 1,
            EntryVerdict::PossibleMatch => self.possible += 1,
            EntryVerdict::NoMatch => self.non_matches += 1,
        }
    }

    /// Total number of verdicts recorded
    pub fn total(&self) -> usize {
        self.matches + self.approximate + self.possible + self.non_matches
    }

    /// Result of "does ANY entry satisfy the property"
    pub fn any(&self) -> EvaluationResult {
        if self.matches > 0 {
            EvaluationResult::Pass
        } else if self.approximate > 0 {
            EvaluationResult::Warn
        } else if self.possible > 0 {
            EvaluationResult::Undetermined
        } else {
            EvaluationResult::Fail
        }
    }

    /// Result of "do ALL entries satisfy the property"
    ///
    /// An empty tally is a vacuous PASS.
    pub fn all(&self) -> EvaluationResult {
        if self.non_matches > 0 {
            EvaluationResult::Fail
        } else if self.possible > 0 {
            EvaluationResult::Undetermined
        } else if self.approximate > 0 {
            EvaluationResult::Warn
        } else {
            EvaluationResult::Pass
        }
    }
}

impl FromIterator<EntryVerdict> for VerdictTally {
    fn from_iter<I: IntoIterator<Item = EntryVerdict>>(iter: I) -> Self {
        let mut tally = VerdictTally::default();
        for verdict in iter {
            tally.record(verdict);
        }
        tally
    }
}

/// Existential fold over per-entry verdicts
pub fn fold_any<I: IntoIterator<Item = EntryVerdict>>(verdicts: I) -> EvaluationResult {
    let tally: VerdictTally = verdicts.into_iter().collect();
    let result = tally.any();
    trace!("Existential fold over {:?}: {}", tally, result);
    result
}

/// Universal fold over per-entry verdicts
pub fn fold_all<I: IntoIterator<Item = EntryVerdict>>(verdicts: I) -> EvaluationResult {
    let tally: VerdictTally = verdicts.into_iter().collect();
    let result = tally.all();
    trace!("Universal fold over {:?}: {}", tally, result);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use EntryVerdict::*;

    #[test]
    fn test_any_prefers_definite_match() {
        assert_eq!(fold_any([NoMatch, PossibleMatch, Match]), EvaluationResult::Pass);
        assert_eq!(fold_any([ApproximateMatch, Match]), EvaluationResult::Pass);
    }

    #[test]
    fn test_any_ambiguity_is_undetermined_not_fail() {
        assert_eq!(fold_any([NoMatch, PossibleMatch]), EvaluationResult::Undetermined);
    }

    #[test]
    fn test_any_approximate_is_warn() {
        assert_eq!(fold_any([PossibleMatch, ApproximateMatch]), EvaluationResult::Warn);
    }

    #[test]
    fn test_any_empty_is_fail() {
        assert_eq!(fold_any(Vec::<EntryVerdict>::new()), EvaluationResult::Fail);
        assert_eq!(fold_any([NoMatch, NoMatch]), EvaluationResult::Fail);
    }

    #[test]
    fn test_all_breaks_on_non_match() {
        assert_eq!(fold_all([Match, PossibleMatch, NoMatch]), EvaluationResult::Fail);
        assert_eq!(fold_all([Match, PossibleMatch]), EvaluationResult::Undetermined);
        assert_eq!(fold_all([Match, ApproximateMatch]), EvaluationResult::Warn);
        assert_eq!(fold_all([Match, Match]), EvaluationResult::Pass);
        assert_eq!(fold_all(Vec::<EntryVerdict>::new()), EvaluationResult::Pass);
    }

    #[test]
    fn test_tally_counts() {
        let tally: VerdictTally = [Match, NoMatch, NoMatch, PossibleMatch].into_iter().collect();
        assert_eq!(tally.total(), 4);
        assert_eq!(tally.non_matches, 2);
    }

    #[test]
    fn test_evaluation_messages() {
        let evaluation = Evaluation::undetermined("Stop reason unknown").with_message("Entry 2021");
        assert_eq!(evaluation.result, EvaluationResult::Undetermined);
        assert_eq!(evaluation.messages.len(), 2);
        assert_eq!(EvaluationResult::NotEvaluated.to_string(), "NOT_EVALUATED");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn verdict() -> impl Strategy<Value = EntryVerdict> {
        prop_oneof![
            Just(EntryVerdict::NoMatch),
            Just(EntryVerdict::PossibleMatch),
            Just(EntryVerdict::ApproximateMatch),
            Just(EntryVerdict::Match),
        ]
    }

    proptest! {
        /// Property: one definite match makes the existential fold PASS
        #[test]
        fn test_any_match_passes(mut verdicts in proptest::collection::vec(verdict(), 0..10), at in 0usize..10) {
            let at = at.min(verdicts.len());
            verdicts.insert(at, EntryVerdict::Match);
            prop_assert_eq!(fold_any(verdicts), EvaluationResult::Pass);
        }

        /// Property: folds never produce NOT_EVALUATED
        #[test]
        fn test_folds_never_not_evaluated(verdicts in proptest::collection::vec(verdict(), 0..10)) {
            prop_assert_ne!(fold_any(verdicts.clone()), EvaluationResult::NotEvaluated);
            prop_assert_ne!(fold_all(verdicts), EvaluationResult::NotEvaluated);
        }

        /// Property: a possible match without definite ones is never FAIL
        #[test]
        fn test_possible_match_never_fails(verdicts in proptest::collection::vec(verdict(), 0..10)) {
            let mut verdicts: Vec<_> = verdicts.into_iter().filter(|v| *v != EntryVerdict::Match).collect();
            verdicts.push(EntryVerdict::PossibleMatch);
            prop_assert_ne!(fold_any(verdicts), EvaluationResult::Fail);
        }
    }
}
