//! Treatment predicates
//!
//! A predicate names what a rule is looking for: categories, drug types and/or
//! treatment names, all of which must hold when given. Matching is graded so
//! that a treatment recorded only with a generic drug type, or with no drug
//! types at all, is not mistaken for a non-match.

use crate::evaluation::EntryVerdict;
use crate::CoreError;
use regimen_domain::{DrugType, Treatment, TreatmentCategory, TreatmentHistoryEntry};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// How well a treatment satisfies a predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PredicateMatch {
    /// Definitely not matching
    None,
    /// Category matches but drug types were not recorded
    Unknown,
    /// Matches only through a more generic drug type
    Approximate,
    /// Matches exactly
    Exact,
}

impl PredicateMatch {
    /// Per-entry verdict for folding
    pub fn verdict(&self) -> EntryVerdict {
        match self {
            PredicateMatch::Exact => EntryVerdict::Match,
            PredicateMatch::Approximate => EntryVerdict::ApproximateMatch,
            PredicateMatch::Unknown => EntryVerdict::PossibleMatch,
            PredicateMatch::None => EntryVerdict::NoMatch,
        }
    }
}

/// A discriminating predicate over treatments
///
/// # Examples
///
/// ```
/// use regimen_core::TreatmentPredicate;
/// use regimen_domain::{DrugType, Treatment, TreatmentCategory};
///
/// let platinum = TreatmentPredicate::new(
///     [TreatmentCategory::Chemotherapy],
///     [DrugType::PlatinumCompound],
///     Vec::<String>::new(),
/// )
/// .unwrap();
///
/// let carboplatin = Treatment::new("CARBOPLATIN", TreatmentCategory::Chemotherapy)
///     .with_type(DrugType::PlatinumCompound);
/// assert!(platinum.matches(&carboplatin));
///
/// // No criteria at all is a configuration fault
/// assert!(TreatmentPredicate::new([], [], Vec::<String>::new()).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PredicateDefinition", into = "PredicateDefinition")]
pub struct TreatmentPredicate {
    categories: BTreeSet<TreatmentCategory>,
    types: BTreeSet<DrugType>,
    names: BTreeSet<String>,
}

impl TreatmentPredicate {
    /// Create a predicate
    ///
    /// # Errors
    /// Returns `CoreError::EmptyPredicate` if no criterion is given
    pub fn new<C, T, N>(categories: C, types: T, names: N) -> Result<Self, CoreError>
    where
        C: IntoIterator<Item = TreatmentCategory>,
        T: IntoIterator<Item = DrugType>,
        N: IntoIterator,
        N::Item: Into<String>,
    {
        let predicate = Self {
            categories: categories.into_iter().collect(),
            types: types.into_iter().collect(),
            names: names.into_iter().map(|n| n.into().to_uppercase()).collect(),
        };

        if predicate.categories.is_empty() && predicate.types.is_empty() && predicate.names.is_empty() {
            return Err(CoreError::EmptyPredicate);
        }
        Ok(predicate)
    }

    /// Predicate on a single category
    pub fn category(category: TreatmentCategory) -> Self {
        Self {
            categories: BTreeSet::from([category]),
            types: BTreeSet::new(),
            names: BTreeSet::new(),
        }
    }

    /// Predicate on a category restricted to drug types
    pub fn category_with_types<T>(category: TreatmentCategory, types: T) -> Self
    where
        T: IntoIterator<Item = DrugType>,
    {
        Self {
            types: types.into_iter().collect(),
            ..Self::category(category)
        }
    }

    /// Requested categories
    pub fn categories(&self) -> &BTreeSet<TreatmentCategory> {
        &self.categories
    }

    /// Requested drug types
    pub fn types(&self) -> &BTreeSet<DrugType> {
        &self.types
    }

    /// Classify a single treatment
    pub fn classify(&self, treatment: &Treatment) -> PredicateMatch {
        if !self.names.is_empty() {
            let name_matches = self.names.contains(&treatment.name.to_uppercase())
                || treatment
                    .drugs
                    .iter()
                    .any(|d| self.names.contains(&d.name.to_uppercase()));
            if !name_matches {
                return PredicateMatch::None;
            }
        }

        let mut grade = PredicateMatch::Exact;

        if !self.categories.is_empty() {
            let categories = treatment.all_categories();
            if categories.is_empty() {
                grade = PredicateMatch::Unknown;
            } else if categories.is_disjoint(&self.categories) {
                return PredicateMatch::None;
            }
        }

        if !self.types.is_empty() {
            grade = grade.min(self.classify_types(&treatment.types()));
        }

        grade
    }

    fn classify_types(&self, recorded: &BTreeSet<DrugType>) -> PredicateMatch {
        if recorded.is_empty() {
            return PredicateMatch::Unknown;
        }

        let exact = recorded
            .iter()
            .any(|t| self.types.iter().any(|wanted| t.is_a(*wanted)));
        if exact {
            return PredicateMatch::Exact;
        }

        let generic = recorded
            .iter()
            .any(|t| self.types.iter().any(|wanted| wanted.is_a(*t)));
        if generic {
            PredicateMatch::Approximate
        } else {
            PredicateMatch::None
        }
    }

    /// Whether the treatment matches exactly
    pub fn matches(&self, treatment: &Treatment) -> bool {
        self.classify(treatment) == PredicateMatch::Exact
    }

    /// Whether the treatment could match given what is recorded
    pub fn may_match(&self, treatment: &Treatment) -> bool {
        self.classify(treatment) != PredicateMatch::None
    }

    /// Best classification over every treatment of an entry
    pub fn classify_entry(&self, entry: &TreatmentHistoryEntry) -> PredicateMatch {
        entry
            .all_treatments()
            .into_iter()
            .map(|t| self.classify(t))
            .max()
            .unwrap_or(PredicateMatch::None)
    }
}

impl fmt::Display for TreatmentPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = Vec::new();
        if !self.names.is_empty() {
            parts.push(self.names.iter().cloned().collect::<Vec<_>>().join(" or "));
        }
        if !self.categories.is_empty() {
            parts.push(
                self.categories
                    .iter()
                    .map(|c| c.as_str())
                    .collect::<Vec<_>>()
                    .join(" or "),
            );
        }
        if !self.types.is_empty() {
            let types: Vec<String> = self.types.iter().map(|t| format!("{:?}", t)).collect();
            parts.push(format!("of type {}", types.join(" or ")));
        }
        f.write_str(&parts.join(" "))
    }
}

/// Serialized form of a predicate, validated on load
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PredicateDefinition {
    /// Requested categories
    #[serde(default)]
    pub categories: Vec<TreatmentCategory>,
    /// Requested drug types
    #[serde(default)]
    pub types: Vec<DrugType>,
    /// Requested treatment or drug names
    #[serde(default)]
    pub names: Vec<String>,
}

impl TryFrom<PredicateDefinition> for TreatmentPredicate {
    type Error = CoreError;

    fn try_from(definition: PredicateDefinition) -> Result<Self, Self::Error> {
        TreatmentPredicate::new(definition.categories, definition.types, definition.names)
    }
}

impl From<TreatmentPredicate> for PredicateDefinition {
    fn from(predicate: TreatmentPredicate) -> Self {
        Self {
            categories: predicate.categories.into_iter().collect(),
            types: predicate.types.into_iter().collect(),
            names: predicate.names.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regimen_domain::Drug;

    fn platinum() -> TreatmentPredicate {
        TreatmentPredicate::category_with_types(
            TreatmentCategory::Chemotherapy,
            [DrugType::PlatinumCompound],
        )
    }

    #[test]
    fn test_empty_predicate_is_rejected() {
        let result = TreatmentPredicate::new([], [], Vec::<String>::new());
        assert_eq!(result, Err(CoreError::EmptyPredicate));
    }

    #[test]
    fn test_exact_type_match() {
        let cisplatin = Treatment::new("CISPLATIN", TreatmentCategory::Chemotherapy)
            .with_type(DrugType::PlatinumCompound);
        assert_eq!(platinum().classify(&cisplatin), PredicateMatch::Exact);
    }

    #[test]
    fn test_unknown_types_are_possible() {
        let chemo = Treatment::new("CHEMO", TreatmentCategory::Chemotherapy);
        assert_eq!(platinum().classify(&chemo), PredicateMatch::Unknown);
        assert!(platinum().may_match(&chemo));
        assert!(!platinum().matches(&chemo));
    }

    #[test]
    fn test_other_type_is_no_match() {
        let paclitaxel = Treatment::new("PACLITAXEL", TreatmentCategory::Chemotherapy)
            .with_type(DrugType::Taxane);
        assert_eq!(platinum().classify(&paclitaxel), PredicateMatch::None);
    }

    #[test]
    fn test_generic_type_is_approximate() {
        let predicate = TreatmentPredicate::category_with_types(
            TreatmentCategory::Immunotherapy,
            [DrugType::AntiPd1],
        );
        let checkpoint = Treatment::new("CHECKPOINT INHIBITOR", TreatmentCategory::Immunotherapy)
            .with_type(DrugType::ImmuneCheckpointInhibitor);
        assert_eq!(predicate.classify(&checkpoint), PredicateMatch::Approximate);

        let generic_predicate = TreatmentPredicate::category_with_types(
            TreatmentCategory::Immunotherapy,
            [DrugType::ImmuneCheckpointInhibitor],
        );
        let nivolumab = Treatment::new("NIVOLUMAB", TreatmentCategory::Immunotherapy)
            .with_type(DrugType::AntiPd1);
        assert_eq!(generic_predicate.classify(&nivolumab), PredicateMatch::Exact);
    }

    #[test]
    fn test_name_predicate_matches_drugs() {
        let predicate =
            TreatmentPredicate::new([], [], ["carboplatin"]).unwrap();
        let combo = Treatment::from_drugs(
            "CARBOPLATIN+PACLITAXEL",
            vec![
                Drug::new("Carboplatin", TreatmentCategory::Chemotherapy),
                Drug::new("Paclitaxel", TreatmentCategory::Chemotherapy),
            ],
        );
        assert!(predicate.matches(&combo));
        assert!(!predicate.may_match(&Treatment::new("FOLFOX", TreatmentCategory::Chemotherapy)));
    }

    #[test]
    fn test_classify_entry_takes_best_stage() {
        let entry = TreatmentHistoryEntry::new(vec![Treatment::new(
            "PACLITAXEL",
            TreatmentCategory::Chemotherapy,
        )
        .with_type(DrugType::Taxane)])
        .with_switch_to(regimen_domain::TreatmentStage::new(
            Treatment::new("CARBOPLATIN", TreatmentCategory::Chemotherapy)
                .with_type(DrugType::PlatinumCompound),
        ));

        assert_eq!(platinum().classify_entry(&entry), PredicateMatch::Exact);
        assert_eq!(
            platinum().classify_entry(&TreatmentHistoryEntry::undisclosed_trial(None)),
            PredicateMatch::None
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(platinum().to_string(), "chemotherapy of type PlatinumCompound");
    }

    #[test]
    fn test_deserialize_validates() {
        let predicate: TreatmentPredicate =
            serde_json::from_str(r#"{"categories": ["IMMUNOTHERAPY"]}"#).unwrap();
        assert_eq!(predicate, TreatmentPredicate::category(TreatmentCategory::Immunotherapy));

        assert!(serde_json::from_str::<TreatmentPredicate>("{}").is_err());
    }
}
