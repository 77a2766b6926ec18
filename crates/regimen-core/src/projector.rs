//! Stage projector
//!
//! Decomposes a multi-stage course into `[base, switch_1, ..., switch_k,
//! maintenance?]` and returns the minimal entry covering the leading contiguous
//! run of stages that match a predicate. Stages matching again after a gap are
//! not bridged.
//!
//! # Example
//!
//! ```text
//! base: ChemoA (2 cycles)  ->  switch: ChemoB (3 cycles, 2020-01)  ->  maintenance: SupportiveC (2021-04)
//!
//! project(entry, is chemotherapy)
//!   treatments = {ChemoA, ChemoB}
//!   cycles     = 5
//!   stop       = 2021-04 (start of the first stage after the run)
//! ```

use regimen_domain::{PartialDate, Treatment, TreatmentHistoryDetails, TreatmentHistoryEntry};
use tracing::trace;

/// Position of a stage within its course
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageKind {
    /// The base treatments of the entry
    Base,
    /// A switch-to stage, by index in the entry's list
    SwitchTo(usize),
    /// The maintenance stage
    Maintenance,
}

/// Borrowed view of one stage of a course
#[derive(Debug, Clone, PartialEq)]
pub struct StageView<'a> {
    /// Position of the stage
    pub kind: StageKind,
    /// Treatments given during the stage
    pub treatments: Vec<&'a Treatment>,
    /// When the stage started
    pub start: Option<PartialDate>,
    /// Cycles given during the stage
    pub cycles: Option<u32>,
}

impl StageView<'_> {
    /// A stage matches if at least one of its treatments does
    pub fn matches<P>(&self, predicate: P) -> bool
    where
        P: Fn(&Treatment) -> bool,
    {
        self.treatments.iter().copied().any(predicate)
    }
}

/// Flatten an entry into its stages in chronological order
pub fn stages(entry: &TreatmentHistoryEntry) -> Vec<StageView<'_>> {
    let base = StageView {
        kind: StageKind::Base,
        treatments: entry.treatments.iter().collect(),
        start: entry.start,
        cycles: entry.cycles(),
    };

    let switches = entry
        .switch_to()
        .iter()
        .enumerate()
        .map(|(i, stage)| StageView {
            kind: StageKind::SwitchTo(i),
            treatments: vec![&stage.treatment],
            start: stage.start,
            cycles: stage.cycles,
        });

    let maintenance = entry.maintenance().map(|stage| StageView {
        kind: StageKind::Maintenance,
        treatments: vec![&stage.treatment],
        start: stage.start,
        cycles: stage.cycles,
    });

    std::iter::once(base).chain(switches).chain(maintenance).collect()
}

/// Stages of an entry paired with whether each matches
pub fn matching_stages<P>(entry: &TreatmentHistoryEntry, predicate: P) -> Vec<(StageView<'_>, bool)>
where
    P: Fn(&Treatment) -> bool,
{
    stages(entry)
        .into_iter()
        .map(|stage| {
            let matched = stage.matches(&predicate);
            (stage, matched)
        })
        .collect()
}

/// Project an entry onto the leading run of stages matching `predicate`
///
/// Returns `None` if no stage matches. The result carries no switch-to or
/// maintenance stages; their treatments are merged into `treatments`. Stop
/// reason and best response describe the end of the whole course, so they are
/// kept only when the run reaches that end.
///
/// A stage without any disclosed treatment never matches, so an undisclosed
/// trial entry projects to `None` under every predicate, including one that
/// accepts everything.
pub fn project<P>(entry: &TreatmentHistoryEntry, predicate: P) -> Option<TreatmentHistoryEntry>
where
    P: Fn(&Treatment) -> bool,
{
    let stages = stages(entry);
    let first = stages.iter().position(|s| s.matches(&predicate))?;
    let end = run_end(&stages, first, &predicate);
    Some(project_run(entry, &stages, first, end))
}

/// Project an entry onto every maximal run of stages matching `predicate`
///
/// Runs are separated by at least one non-matching stage and are never merged.
/// The first run, if any, equals [`project`].
pub fn project_runs<P>(entry: &TreatmentHistoryEntry, predicate: P) -> Vec<TreatmentHistoryEntry>
where
    P: Fn(&Treatment) -> bool,
{
    let stages = stages(entry);
    let mut runs = Vec::new();
    let mut from = 0;

    while let Some(offset) = stages[from..].iter().position(|s| s.matches(&predicate)) {
        let first = from + offset;
        let end = run_end(&stages, first, &predicate);
        runs.push(project_run(entry, &stages, first, end));
        from = end;
    }
    runs
}

fn run_end<P>(stages: &[StageView<'_>], first: usize, predicate: &P) -> usize
where
    P: Fn(&Treatment) -> bool,
{
    stages[first..]
        .iter()
        .position(|s| !s.matches(predicate))
        .map_or(stages.len(), |offset| first + offset)
}

fn project_run(
    entry: &TreatmentHistoryEntry,
    stages: &[StageView<'_>],
    first: usize,
    end: usize,
) -> TreatmentHistoryEntry {
    let run = &stages[first..end];
    let reaches_end = end == stages.len();

    let mut treatments: Vec<Treatment> = Vec::new();
    for treatment in run.iter().flat_map(|s| s.treatments.iter().copied()) {
        if !treatments.contains(treatment) {
            treatments.push(treatment.clone());
        }
    }

    let start = match first {
        0 => entry.start,
        _ => run[0].start,
    };
    let stop = if reaches_end {
        entry.stop()
    } else {
        stages[end].start
    };
    let cycles = run
        .iter()
        .filter_map(|s| s.cycles)
        .reduce(|a, b| a.saturating_add(b));
    let (stop_reason, best_response) = if reaches_end {
        (entry.stop_reason(), entry.best_response())
    } else {
        (None, None)
    };

    let details = TreatmentHistoryDetails {
        stop,
        stop_reason,
        best_response,
        cycles,
        switch_to: Vec::new(),
        maintenance: None,
    };

    trace!(
        "Projected '{}' onto stages {}..{} of {}",
        entry.treatment_display(),
        first,
        end,
        stages.len()
    );

    TreatmentHistoryEntry {
        treatments,
        start,
        details: match (&entry.details, details.is_empty()) {
            (None, true) => None,
            _ => Some(details),
        },
        intents: entry.intents.clone(),
        is_trial: entry.is_trial,
        trial_acronym: entry.trial_acronym.clone(),
    }
}
