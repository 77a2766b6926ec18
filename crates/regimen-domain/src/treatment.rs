//! Treatments, drugs and their classifications

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Broad category of an oncological treatment
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TreatmentCategory {
    /// Cytotoxic chemotherapy
    Chemotherapy,
    /// Small molecules or antibodies against a molecular target
    TargetedTherapy,
    /// Immune system modulating therapy
    Immunotherapy,
    /// Endocrine therapy
    HormoneTherapy,
    /// Radiation therapy
    Radiotherapy,
    /// Surgical resection
    Surgery,
    /// Stem cell or organ transplantation
    Transplantation,
    /// Local ablative therapy (RFA, cryoablation)
    Ablation,
    /// Supportive or symptomatic care
    SupportiveTreatment,
    /// Chimeric antigen receptor T-cell therapy
    CarT,
    /// Gene therapy
    GeneTherapy,
    /// Antiviral therapy
    AntiviralTherapy,
}

impl TreatmentCategory {
    /// Every category, in declaration order
    pub const ALL: [TreatmentCategory; 12] = [
        TreatmentCategory::Chemotherapy,
        TreatmentCategory::TargetedTherapy,
        TreatmentCategory::Immunotherapy,
        TreatmentCategory::HormoneTherapy,
        TreatmentCategory::Radiotherapy,
        TreatmentCategory::Surgery,
        TreatmentCategory::Transplantation,
        TreatmentCategory::Ablation,
        TreatmentCategory::SupportiveTreatment,
        TreatmentCategory::CarT,
        TreatmentCategory::GeneTherapy,
        TreatmentCategory::AntiviralTherapy,
    ];

    /// Get the category name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            TreatmentCategory::Chemotherapy => "chemotherapy",
            TreatmentCategory::TargetedTherapy => "targeted therapy",
            TreatmentCategory::Immunotherapy => "immunotherapy",
            TreatmentCategory::HormoneTherapy => "hormone therapy",
            TreatmentCategory::Radiotherapy => "radiotherapy",
            TreatmentCategory::Surgery => "surgery",
            TreatmentCategory::Transplantation => "transplantation",
            TreatmentCategory::Ablation => "ablation",
            TreatmentCategory::SupportiveTreatment => "supportive treatment",
            TreatmentCategory::CarT => "CAR-T",
            TreatmentCategory::GeneTherapy => "gene therapy",
            TreatmentCategory::AntiviralTherapy => "antiviral therapy",
        }
    }

    /// Whether treatments of this category act systemically by default
    pub fn is_systemic_by_default(&self) -> bool {
        !matches!(
            self,
            TreatmentCategory::Radiotherapy
                | TreatmentCategory::Surgery
                | TreatmentCategory::Ablation
                | TreatmentCategory::SupportiveTreatment
        )
    }
}

/// Drug-type tag
///
/// Some tags are generic classifications of others (see [`DrugType::generic`]).
/// A treatment recorded with a generic tag only approximately matches a
/// request for one of the specific tags below it.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DrugType {
    PlatinumCompound,
    Antimetabolite,
    Pyrimidine,
    Taxane,
    Anthracycline,
    AlkylatingAgent,
    TopoisomeraseInhibitor,
    ImmuneCheckpointInhibitor,
    AntiPd1,
    AntiPdL1,
    AntiCtla4,
    TyrosineKinaseInhibitor,
    EgfrInhibitor,
    AlkInhibitor,
    BrafInhibitor,
    MekInhibitor,
    MonoclonalAntibody,
    AntiVegf,
    AntiHer2,
    AntiAndrogen,
    AromataseInhibitor,
    Parp,
}

impl DrugType {
    /// The more generic classification this tag refines, if any
    pub fn generic(&self) -> Option<DrugType> {
        match self {
            DrugType::Pyrimidine => Some(DrugType::Antimetabolite),
            DrugType::AntiPd1 | DrugType::AntiPdL1 | DrugType::AntiCtla4 => {
                Some(DrugType::ImmuneCheckpointInhibitor)
            }
            DrugType::EgfrInhibitor
            | DrugType::AlkInhibitor
            | DrugType::BrafInhibitor
            | DrugType::MekInhibitor => Some(DrugType::TyrosineKinaseInhibitor),
            DrugType::AntiVegf | DrugType::AntiHer2 => Some(DrugType::MonoclonalAntibody),
            _ => None,
        }
    }

    /// Whether this tag is `other` or a refinement of it
    pub fn is_a(&self, other: DrugType) -> bool {
        let mut current = Some(*self);
        while let Some(t) = current {
            if t == other {
                return true;
            }
            current = t.generic();
        }
        false
    }
}

/// A single drug
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Drug {
    /// Drug name
    pub name: String,

    /// Category of the drug
    pub category: TreatmentCategory,

    /// Drug-type tags (empty when not curated)
    #[serde(default)]
    pub drug_types: BTreeSet<DrugType>,
}

impl Drug {
    /// Create a new drug
    pub fn new(name: impl Into<String>, category: TreatmentCategory) -> Self {
        Self {
            name: name.into(),
            category,
            drug_types: BTreeSet::new(),
        }
    }

    /// Add a drug-type tag
    pub fn with_type(mut self, drug_type: DrugType) -> Self {
        self.drug_types.insert(drug_type);
        self
    }
}

/// A named treatment
///
/// Categories and drug types may be recorded on the treatment itself, derived
/// from its drugs, or both. Empty drug types mean "not known", not "none".
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Treatment {
    /// Treatment name as curated
    pub name: String,

    /// Categories recorded on the treatment
    #[serde(default)]
    pub categories: BTreeSet<TreatmentCategory>,

    /// Drug-type tags recorded on the treatment
    #[serde(default)]
    pub drug_types: BTreeSet<DrugType>,

    /// Whether the treatment has body-wide effect
    pub is_systemic: bool,

    /// Constituent drugs, if curated
    #[serde(default)]
    pub drugs: Vec<Drug>,
}

impl Treatment {
    /// Create a treatment with a single category
    ///
    /// Systemic flag follows the category default.
    pub fn new(name: impl Into<String>, category: TreatmentCategory) -> Self {
        Self {
            name: name.into(),
            categories: BTreeSet::from([category]),
            drug_types: BTreeSet::new(),
            is_systemic: category.is_systemic_by_default(),
            drugs: Vec::new(),
        }
    }

    /// Create a drug treatment from its drugs
    pub fn from_drugs(name: impl Into<String>, drugs: Vec<Drug>) -> Self {
        let is_systemic = drugs.iter().any(|d| d.category.is_systemic_by_default());
        Self {
            name: name.into(),
            categories: BTreeSet::new(),
            drug_types: BTreeSet::new(),
            is_systemic,
            drugs,
        }
    }

    /// Add a drug-type tag
    pub fn with_type(mut self, drug_type: DrugType) -> Self {
        self.drug_types.insert(drug_type);
        self
    }

    /// Override the systemic flag
    pub fn with_systemic(mut self, is_systemic: bool) -> Self {
        self.is_systemic = is_systemic;
        self
    }

    /// Categories from the treatment and all its drugs
    pub fn all_categories(&self) -> BTreeSet<TreatmentCategory> {
        self.categories
            .iter()
            .copied()
            .chain(self.drugs.iter().map(|d| d.category))
            .collect()
    }

    /// Drug types from the treatment and all its drugs
    pub fn types(&self) -> BTreeSet<DrugType> {
        self.drug_types
            .iter()
            .copied()
            .chain(self.drugs.iter().flat_map(|d| d.drug_types.iter().copied()))
            .collect()
    }

    /// Whether the treatment belongs to the category
    pub fn has_category(&self, category: TreatmentCategory) -> bool {
        self.all_categories().contains(&category)
    }
}
