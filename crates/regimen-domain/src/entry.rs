//! Treatment history entries
//!
//! An entry is one course of treatment as curated from the patient record.
//! A course may change regimen along the way (switch-to stages) and end with a
//! maintenance stage without becoming a new line. Chronological order within an
//! entry is base, then switch-to stages in list order, then maintenance.
//!
//! Entries are immutable once built; every operation in the reasoning core
//! returns a new entry rather than modifying one.

use crate::{PartialDate, Treatment, TreatmentCategory};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Why a course was stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StopReason {
    /// Disease progressed on treatment
    ProgressiveDisease,
    /// Unacceptable toxicity
    Toxicity,
    /// Planned course completed
    CompletedTreatment,
    /// Patient decision
    PatientPreference,
    /// Any other documented reason
    Other,
}

/// Best response observed during a course
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TreatmentResponse {
    /// Complete response
    CompleteResponse,
    /// Partial response
    PartialResponse,
    /// Stable disease
    StableDisease,
    /// Progressive disease
    ProgressiveDisease,
    /// Mixed response
    Mixed,
}

/// Intent with which a course was given
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Intent {
    Curative,
    Neoadjuvant,
    Adjuvant,
    Induction,
    Consolidation,
    Maintenance,
    Palliative,
}

/// One phase of a multi-phase course
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreatmentStage {
    /// Treatment given during this phase
    pub treatment: Treatment,

    /// When the phase started
    #[serde(default)]
    pub start: Option<PartialDate>,

    /// Number of cycles given in this phase
    #[serde(default)]
    pub cycles: Option<u32>,
}

impl TreatmentStage {
    /// Create a stage with no recorded start or cycles
    pub fn new(treatment: Treatment) -> Self {
        Self {
            treatment,
            start: None,
            cycles: None,
        }
    }

    /// Set the start date
    pub fn with_start(mut self, start: PartialDate) -> Self {
        self.start = Some(start);
        self
    }

    /// Set the number of cycles
    pub fn with_cycles(mut self, cycles: u32) -> Self {
        self.cycles = Some(cycles);
        self
    }
}

/// Optional details of a course
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TreatmentHistoryDetails {
    /// When the whole course stopped
    #[serde(default)]
    pub stop: Option<PartialDate>,

    /// Why the course stopped
    #[serde(default)]
    pub stop_reason: Option<StopReason>,

    /// Best response during the course
    #[serde(default)]
    pub best_response: Option<TreatmentResponse>,

    /// Cycles of the base treatments
    #[serde(default)]
    pub cycles: Option<u32>,

    /// Switch-to stages in chronological order
    #[serde(default)]
    pub switch_to: Vec<TreatmentStage>,

    /// Maintenance stage closing the course
    #[serde(default)]
    pub maintenance: Option<TreatmentStage>,
}

impl TreatmentHistoryDetails {
    /// Whether no detail is recorded at all
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// One course of treatment from the patient's history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreatmentHistoryEntry {
    /// Base treatments of the course
    pub treatments: Vec<Treatment>,

    /// When the course started
    #[serde(default)]
    pub start: Option<PartialDate>,

    /// Stop date, response, cycles and later stages
    #[serde(default)]
    pub details: Option<TreatmentHistoryDetails>,

    /// Intents of the course
    #[serde(default)]
    pub intents: BTreeSet<Intent>,

    /// Whether the course was given within a clinical trial
    #[serde(default)]
    pub is_trial: bool,

    /// Trial acronym, when known
    #[serde(default)]
    pub trial_acronym: Option<String>,
}

impl TreatmentHistoryEntry {
    /// Create an entry from its base treatments
    pub fn new(treatments: Vec<Treatment>) -> Self {
        Self {
            treatments,
            start: None,
            details: None,
            intents: BTreeSet::new(),
            is_trial: false,
            trial_acronym: None,
        }
    }

    /// A trial entry whose treatments were not disclosed
    pub fn undisclosed_trial(acronym: Option<String>) -> Self {
        Self {
            is_trial: true,
            trial_acronym: acronym,
            ..Self::new(Vec::new())
        }
    }

    /// Set the start date
    pub fn with_start(mut self, start: PartialDate) -> Self {
        self.start = Some(start);
        self
    }

    /// Set the stop date
    pub fn with_stop(mut self, stop: PartialDate) -> Self {
        self.details_mut().stop = Some(stop);
        self
    }

    /// Set the stop reason
    pub fn with_stop_reason(mut self, reason: StopReason) -> Self {
        self.details_mut().stop_reason = Some(reason);
        self
    }

    /// Set the best response
    pub fn with_best_response(mut self, response: TreatmentResponse) -> Self {
        self.details_mut().best_response = Some(response);
        self
    }

    /// Set the base cycle count
    pub fn with_cycles(mut self, cycles: u32) -> Self {
        self.details_mut().cycles = Some(cycles);
        self
    }

    /// Append a switch-to stage
    pub fn with_switch_to(mut self, stage: TreatmentStage) -> Self {
        self.details_mut().switch_to.push(stage);
        self
    }

    /// Set the maintenance stage
    pub fn with_maintenance(mut self, stage: TreatmentStage) -> Self {
        self.details_mut().maintenance = Some(stage);
        self
    }

    /// Add an intent
    pub fn with_intent(mut self, intent: Intent) -> Self {
        self.intents.insert(intent);
        self
    }

    /// Mark the entry as part of a clinical trial
    pub fn with_trial(mut self, acronym: Option<String>) -> Self {
        self.is_trial = true;
        self.trial_acronym = acronym;
        self
    }

    // Builder-only; entries are read-only once handed to the core
    fn details_mut(&mut self) -> &mut TreatmentHistoryDetails {
        self.details.get_or_insert_with(TreatmentHistoryDetails::default)
    }

    /// Recorded stop date
    pub fn stop(&self) -> Option<PartialDate> {
        self.details.as_ref().and_then(|d| d.stop)
    }

    /// Recorded stop reason
    pub fn stop_reason(&self) -> Option<StopReason> {
        self.details.as_ref().and_then(|d| d.stop_reason)
    }

    /// Recorded best response
    pub fn best_response(&self) -> Option<TreatmentResponse> {
        self.details.as_ref().and_then(|d| d.best_response)
    }

    /// Recorded base cycle count
    pub fn cycles(&self) -> Option<u32> {
        self.details.as_ref().and_then(|d| d.cycles)
    }

    /// Switch-to stages, empty when none recorded
    pub fn switch_to(&self) -> &[TreatmentStage] {
        self.details
            .as_ref()
            .map(|d| d.switch_to.as_slice())
            .unwrap_or(&[])
    }

    /// Maintenance stage, if any
    pub fn maintenance(&self) -> Option<&TreatmentStage> {
        self.details.as_ref().and_then(|d| d.maintenance.as_ref())
    }

    /// Whether the entry has switch-to or maintenance stages
    pub fn has_stages(&self) -> bool {
        !self.switch_to().is_empty() || self.maintenance().is_some()
    }

    /// Every treatment of the course: base, switch-to, then maintenance
    pub fn all_treatments(&self) -> Vec<&Treatment> {
        self.treatments
            .iter()
            .chain(self.switch_to().iter().map(|s| &s.treatment))
            .chain(self.maintenance().map(|s| &s.treatment))
            .collect()
    }

    /// Categories across all treatments of the course
    pub fn categories(&self) -> BTreeSet<TreatmentCategory> {
        self.all_treatments()
            .into_iter()
            .flat_map(|t| t.all_categories())
            .collect()
    }

    /// Whether any treatment of the course is systemic
    pub fn is_systemic(&self) -> bool {
        self.all_treatments().iter().any(|t| t.is_systemic)
    }

    /// Identity used to decide whether two entries may be the same line
    ///
    /// Empty when the treatments were not disclosed.
    pub fn treatment_identity(&self) -> BTreeSet<String> {
        self.treatments.iter().map(|t| t.name.to_uppercase()).collect()
    }

    /// Human-readable name of the course
    pub fn treatment_display(&self) -> String {
        if self.treatments.is_empty() {
            return match &self.trial_acronym {
                Some(acronym) => format!("trial {}", acronym),
                None => "unknown treatment".to_string(),
            };
        }
        self.treatments
            .iter()
            .map(|t| t.name.as_str())
            .collect::<Vec<_>>()
            .join(" + ")
    }
}
