//! Temporal resolver
//!
//! Reconciles partially known dates across a treatment history. Inferred
//! values are always reported next to the recorded ones; choosing between them
//! is an explicit [`StopDatePolicy`].

use regimen_domain::partial_date::months_between_with_policy;
use regimen_domain::{DateOrdering, PartialDate, TreatmentHistoryEntry, UnknownMonthPolicy};
use serde::{Deserialize, Serialize};

pub use regimen_domain::partial_date::{compare, months_between};

/// Whether a missing stop date may be inferred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopDatePolicy {
    /// Only the recorded stop date is used
    #[default]
    RecordedOnly,

    /// A missing stop date is bounded by the next entry's start date
    InferFromNextEntry,
}

/// Recorded and inferred stop date of an entry, kept apart
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StopDateResolution {
    /// Stop date as recorded on the entry
    pub recorded: Option<PartialDate>,

    /// Start of the next entry, only when nothing was recorded
    pub inferred: Option<PartialDate>,
}

impl StopDateResolution {
    /// Stop date to use under the given policy
    pub fn effective(&self, policy: StopDatePolicy) -> Option<PartialDate> {
        match policy {
            StopDatePolicy::RecordedOnly => self.recorded,
            StopDatePolicy::InferFromNextEntry => self.recorded.or(self.inferred),
        }
    }

    /// Whether the effective date under `policy` is an inference
    pub fn is_inferred(&self, policy: StopDatePolicy) -> bool {
        self.recorded.is_none() && self.effective(policy).is_some()
    }
}

/// Resolve the stop date of `entry`, optionally bounded by the next entry
pub fn resolve_stop_date(
    entry: &TreatmentHistoryEntry,
    next: Option<&TreatmentHistoryEntry>,
) -> StopDateResolution {
    let recorded = entry.stop();
    let inferred = match recorded {
        Some(_) => None,
        None => next
            .and_then(|n| n.start)
            .filter(|start| start.has_year()),
    };

    StopDateResolution { recorded, inferred }
}

/// The earliest entry starting provably after `entry`
///
/// Absent when no entry starts provably later, or when the earliest of those
/// cannot be singled out from the dates available.
pub fn next_chronological_entry<'a>(
    history: &'a [TreatmentHistoryEntry],
    entry: &TreatmentHistoryEntry,
) -> Option<&'a TreatmentHistoryEntry> {
    let start = entry.start?;

    let candidates: Vec<&TreatmentHistoryEntry> = history
        .iter()
        .filter(|e| e.start.is_some_and(|s| s.is_after(&start)))
        .collect();

    candidates.iter().copied().find(|candidate| {
        candidates.iter().all(|other| {
            std::ptr::eq(*candidate, *other)
                || matches!(
                    compare_starts(candidate, other),
                    DateOrdering::Before | DateOrdering::Same
                )
        })
    })
}

fn compare_starts(a: &TreatmentHistoryEntry, b: &TreatmentHistoryEntry) -> DateOrdering {
    match (a.start, b.start) {
        (Some(x), Some(y)) => x.compare(&y),
        _ => DateOrdering::Indeterminate,
    }
}

/// Range of possible month counts between two partial dates
///
/// Unknown months widen the range instead of being guessed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthSpan {
    /// Fewest months the span can cover
    pub min: i64,
    /// Most months the span can cover
    pub max: i64,
}

impl MonthSpan {
    /// The exact count, when the range is a single value
    pub fn exact(&self) -> Option<i64> {
        (self.min == self.max).then_some(self.min)
    }

    /// Whether every value in the range is at most `months`
    pub fn is_at_most(&self, months: i64) -> bool {
        self.max <= months
    }

    /// Whether every value in the range is at least `months`
    pub fn is_at_least(&self, months: i64) -> bool {
        self.min >= months
    }
}

/// Range of months from `from` to `to`
///
/// Absent if either year is unknown or `to` provably precedes `from`. When the
/// order is only indeterminate, `from` is taken not to be after `to`, so the
/// range never goes below zero.
pub fn month_span(from: &PartialDate, to: &PartialDate) -> Option<MonthSpan> {
    if from.compare(to) == DateOrdering::After {
        return None;
    }

    let min = months_between_with_policy(
        from,
        UnknownMonthPolicy::EndOfYear,
        to,
        UnknownMonthPolicy::StartOfYear,
    )?;
    let max = months_between_with_policy(
        from,
        UnknownMonthPolicy::StartOfYear,
        to,
        UnknownMonthPolicy::EndOfYear,
    )?;
    Some(MonthSpan {
        min: min.max(0),
        max,
    })
}

/// Range of months an entry lasted, using the stop date allowed by `policy`
pub fn treatment_duration(
    entry: &TreatmentHistoryEntry,
    history: &[TreatmentHistoryEntry],
    policy: StopDatePolicy,
) -> Option<MonthSpan> {
    let start = entry.start?;
    let next = next_chronological_entry(history, entry);
    let stop = resolve_stop_date(entry, next).effective(policy)?;
    month_span(&start, &stop)
}
