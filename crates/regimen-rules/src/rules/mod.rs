//! Representative eligibility rules
//!
//! Each rule is a thin composition of the core primitives: a predicate, the
//! trial classifier, the projector or resolver, and one of the two folds.

mod cycles;
mod duration;
mod lines;
mod progression;
mod treatment;

pub use cycles::HasHadTreatmentWithMinimumCycles;
pub use duration::HasHadTreatmentForMinimumMonths;
pub use lines::HasHadMinimumLines;
pub use progression::ProgressedOnTreatmentWithinMonths;
pub use treatment::{HasHadTreatment, HasOnlyHadSystemicTreatments};

use regimen_core::{EntryVerdict, PredicateMatch, TreatmentPredicate, TrialClassifier};
use regimen_domain::TreatmentHistoryEntry;

/// Verdict of "did this entry involve a matching treatment"
///
/// A definite non-match on a trial that could hide a matching arm is only a
/// possible match. A trial whose treatments carry any category has disclosed
/// its arm and is judged like any other entry.
pub(crate) fn treatment_verdict(
    predicate: &TreatmentPredicate,
    classifier: &TrialClassifier,
    entry: &TreatmentHistoryEntry,
) -> EntryVerdict {
    match predicate.classify_entry(entry) {
        PredicateMatch::None
            if entry.categories().is_empty()
                && classifier.may_match_any_as_trial(entry, predicate.categories()) =>
        {
            EntryVerdict::PossibleMatch
        }
        grade => grade.verdict(),
    }
}

/// Comma separated treatment names of the given entries
pub(crate) fn describe<'a, I>(entries: I) -> String
where
    I: IntoIterator<Item = &'a TreatmentHistoryEntry>,
{
    entries
        .into_iter()
        .map(|e| e.treatment_display())
        .collect::<Vec<_>>()
        .join(", ")
}
