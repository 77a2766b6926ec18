//! Trial ambiguity classifier
//!
//! A trial entry may hide which treatment was actually given. Flagging every
//! trial as ambiguous for every category would turn most evaluations into
//! UNDETERMINED, so categories that are essentially never given as an
//! undisclosed trial arm are excluded.

use crate::CoreConfig;
use regimen_domain::{TreatmentCategory, TreatmentHistoryEntry};
use std::collections::BTreeSet;

/// Categories implausible as an undisclosed trial arm unless configured otherwise
pub const DEFAULT_IMPLAUSIBLE_TRIAL_CATEGORIES: [TreatmentCategory; 4] = [
    TreatmentCategory::Surgery,
    TreatmentCategory::Transplantation,
    TreatmentCategory::Ablation,
    TreatmentCategory::SupportiveTreatment,
];

/// Decides whether a trial entry could hide a treatment of some category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrialClassifier {
    implausible: BTreeSet<TreatmentCategory>,
}

impl TrialClassifier {
    /// Create a classifier with an explicit implausible set
    pub fn new(implausible: BTreeSet<TreatmentCategory>) -> Self {
        Self { implausible }
    }

    /// Create a classifier from the core configuration
    pub fn from_config(config: &CoreConfig) -> Self {
        Self::new(config.implausible_trial_categories.clone())
    }

    /// Categories never considered hidden behind a trial
    pub fn implausible_categories(&self) -> &BTreeSet<TreatmentCategory> {
        &self.implausible
    }

    /// Whether `entry` may be a trial of the given category
    pub fn may_match_as_trial(
        &self,
        entry: &TreatmentHistoryEntry,
        category: TreatmentCategory,
    ) -> bool {
        entry.is_trial && !self.implausible.contains(&category)
    }

    /// Whether `entry` may be a trial of any of the given categories
    ///
    /// With no categories at all, any plausible trial qualifies.
    pub fn may_match_any_as_trial<'a, I>(&self, entry: &TreatmentHistoryEntry, categories: I) -> bool
    where
        I: IntoIterator<Item = &'a TreatmentCategory>,
    {
        let mut categories = categories.into_iter().peekable();
        if categories.peek().is_none() {
            return entry.is_trial;
        }
        categories.any(|c| self.may_match_as_trial(entry, *c))
    }
}

impl Default for TrialClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_IMPLAUSIBLE_TRIAL_CATEGORIES.into_iter().collect())
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: implausible categories never match, whatever the entry
        #[test]
        fn test_implausible_never_matches(index in 0usize..12, is_trial: bool) {
            let classifier = TrialClassifier::default();
            let category = TreatmentCategory::ALL[index];
            let mut entry = TreatmentHistoryEntry::undisclosed_trial(None);
            entry.is_trial = is_trial;

            if classifier.implausible_categories().contains(&category) {
                prop_assert!(!classifier.may_match_as_trial(&entry, category));
            } else {
                prop_assert_eq!(classifier.may_match_as_trial(&entry, category), is_trial);
            }
        }
    }
}
