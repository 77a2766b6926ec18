//! Treatment line counter
//!
//! Derives a `[min, max]` bound on the number of distinct treatment lines in a
//! collection of entries whose identities and dates may be incomplete.
//!
//! - **min**: entries are grouped by treatment identity. Within a group, only
//!   entries that are provably disjoint in time (one stops strictly before the
//!   next starts) must be separate lines; the longest such chain is the group's
//!   lower bound.
//! - **max**: every entry is a potential line of its own, except entries that
//!   share identity and have identical, fully known start and stop months.

use crate::evaluation::EvaluationResult;
use regimen_domain::{DateOrdering, TreatmentHistoryEntry, YearMonth};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Lower and upper bound on the number of treatment lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineBounds {
    /// Fewest lines the entries can represent
    pub min: usize,
    /// Most lines the entries can represent
    pub max: usize,
}

impl LineBounds {
    /// Bounds over all given entries
    pub fn of(entries: &[TreatmentHistoryEntry]) -> Self {
        let bounds = Self {
            min: min_lines(entries),
            max: max_lines(entries),
        };
        debug!(
            "Line bounds over {} entries: min {}, max {}",
            entries.len(),
            bounds.min,
            bounds.max
        );
        bounds
    }

    /// Bounds over systemic lines only
    ///
    /// Trial entries without disclosed treatments may have been systemic, so
    /// they raise the upper bound but never the lower one.
    pub fn systemic(entries: &[TreatmentHistoryEntry]) -> Self {
        let definite: Vec<TreatmentHistoryEntry> =
            entries.iter().filter(|e| e.is_systemic()).cloned().collect();
        let possible: Vec<TreatmentHistoryEntry> = entries
            .iter()
            .filter(|e| e.is_systemic() || (e.is_trial && e.treatments.is_empty()))
            .cloned()
            .collect();

        let bounds = Self {
            min: min_lines(&definite),
            max: max_lines(&possible),
        };
        debug!(
            "Systemic line bounds: min {}, max {} ({} possibly systemic entries)",
            bounds.min,
            bounds.max,
            possible.len()
        );
        bounds
    }

    /// Whether the bounds pin down one exact count
    pub fn is_exact(&self) -> bool {
        self.min == self.max
    }

    /// Compare against a minimum-lines threshold
    ///
    /// PASS when even the lower bound reaches `threshold`, FAIL when even the
    /// upper bound stays below it, UNDETERMINED otherwise.
    pub fn evaluate_threshold(&self, threshold: usize) -> EvaluationResult {
        if self.min >= threshold {
            EvaluationResult::Pass
        } else if self.max < threshold {
            EvaluationResult::Fail
        } else {
            EvaluationResult::Undetermined
        }
    }
}

/// Lower bound on distinct treatment lines
///
/// Entries without a disclosed treatment could be any other line, so they only
/// count when nothing identified exists.
pub fn min_lines(entries: &[TreatmentHistoryEntry]) -> usize {
    let mut groups: BTreeMap<BTreeSet<String>, Vec<&TreatmentHistoryEntry>> = BTreeMap::new();
    let mut unidentified = Vec::new();

    for entry in entries {
        let identity = entry.treatment_identity();
        if identity.is_empty() {
            unidentified.push(entry);
        } else {
            groups.entry(identity).or_default().push(entry);
        }
    }

    if groups.is_empty() {
        return longest_disjoint_chain(&unidentified);
    }

    groups.values().map(|group| longest_disjoint_chain(group)).sum()
}

/// Upper bound on distinct treatment lines
pub fn max_lines(entries: &[TreatmentHistoryEntry]) -> usize {
    let mut collapsed: BTreeSet<(BTreeSet<String>, YearMonth, YearMonth)> = BTreeSet::new();
    let mut separate = 0;

    for entry in entries {
        let identity = entry.treatment_identity();
        let start = entry.start.and_then(|d| d.exact());
        let stop = entry.stop().and_then(|d| d.exact());

        match (start, stop) {
            (Some(start), Some(stop)) if !identity.is_empty() => {
                collapsed.insert((identity, start, stop));
            }
            _ => separate += 1,
        }
    }

    collapsed.len() + separate
}

/// An entry whose recorded stop provably precedes its start cannot be placed
/// on a timeline
fn has_consistent_range(entry: &TreatmentHistoryEntry) -> bool {
    match (entry.start, entry.stop()) {
        (Some(start), Some(stop)) => start.compare(&stop) != DateOrdering::After,
        _ => true,
    }
}

fn precedes(a: &TreatmentHistoryEntry, b: &TreatmentHistoryEntry) -> bool {
    if !has_consistent_range(a) || !has_consistent_range(b) {
        return false;
    }
    match (a.stop(), b.start) {
        (Some(stop), Some(start)) => stop.is_before(&start),
        _ => false,
    }
}

// `precedes` is acyclic over consistent entries, so the recursion terminates
fn longest_disjoint_chain(group: &[&TreatmentHistoryEntry]) -> usize {
    let mut memo = vec![None; group.len()];
    (0..group.len())
        .map(|i| chain_from(i, group, &mut memo))
        .max()
        .unwrap_or(0)
}

fn chain_from(i: usize, group: &[&TreatmentHistoryEntry], memo: &mut [Option<usize>]) -> usize {
    if let Some(length) = memo[i] {
        return length;
    }

    let mut best = 0;
    for j in 0..group.len() {
        if precedes(group[i], group[j]) {
            best = best.max(chain_from(j, group, memo));
        }
    }

    memo[i] = Some(best + 1);
    best + 1
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use regimen_domain::{PartialDate, Treatment, TreatmentCategory};

    fn partial_date() -> impl Strategy<Value = Option<PartialDate>> {
        proptest::option::of(
            (2015i32..2022, proptest::option::of(1u32..=12))
                .prop_map(|(year, month)| PartialDate::new(Some(year), month).unwrap()),
        )
    }

    fn entry() -> impl Strategy<Value = TreatmentHistoryEntry> {
        (
            proptest::option::of(prop_oneof![Just("X"), Just("Y"), Just("Z")]),
            partial_date(),
            partial_date(),
        )
            .prop_map(|(name, start, stop)| {
                let treatments = name
                    .map(|n| vec![Treatment::new(n, TreatmentCategory::Chemotherapy)])
                    .unwrap_or_default();
                let mut entry = TreatmentHistoryEntry::new(treatments);
                entry.start = start;
                if let Some(stop) = stop {
                    entry = entry.with_stop(stop);
                }
                entry
            })
    }

    proptest! {
        /// Property: the lower bound never exceeds the upper bound
        #[test]
        fn test_min_never_exceeds_max(entries in proptest::collection::vec(entry(), 0..12)) {
            let bounds = LineBounds::of(&entries);
            prop_assert!(bounds.min <= bounds.max, "min {} > max {}", bounds.min, bounds.max);

            let systemic = LineBounds::systemic(&entries);
            prop_assert!(systemic.min <= systemic.max);
        }

        /// Property: complete, pairwise disjoint ranges converge to the exact count
        #[test]
        fn test_bounds_converge_for_disjoint_ranges(count in 1usize..8, names in proptest::collection::vec(0usize..3, 8)) {
            let entries: Vec<TreatmentHistoryEntry> = (0..count)
                .map(|i| {
                    let year = 2000 + i as i32;
                    TreatmentHistoryEntry::new(vec![Treatment::new(
                        ["X", "Y", "Z"][names[i]],
                        TreatmentCategory::Chemotherapy,
                    )])
                    .with_start(PartialDate::year_month(year, 1))
                    .with_stop(PartialDate::year_month(year, 6))
                })
                .collect();

            prop_assert_eq!(LineBounds::of(&entries), LineBounds { min: count, max: count });
        }
    }
}
