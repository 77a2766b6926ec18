//! Partially known dates
//!
//! Treatment histories are curated from clinical notes where a start or stop
//! date is often recorded as a year only, or not at all. `PartialDate` keeps
//! that absence explicit: nothing in this module ever assumes an unknown month
//! is January or December unless a caller passes an [`UnknownMonthPolicy`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of comparing two partial dates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DateOrdering {
    /// The first date is strictly earlier
    Before,

    /// The first date is strictly later
    After,

    /// Both dates are complete and equal
    Same,

    /// The known fields cannot establish an order
    Indeterminate,
}

impl DateOrdering {
    /// Whether the comparison produced an actual order
    pub fn is_definite(&self) -> bool {
        !matches!(self, DateOrdering::Indeterminate)
    }

    /// Ordering seen from the other side
    pub fn reverse(&self) -> Self {
        match self {
            DateOrdering::Before => DateOrdering::After,
            DateOrdering::After => DateOrdering::Before,
            other => *other,
        }
    }
}

/// Explicit policy for turning an unknown month into a definite one
///
/// Call sites that need a definite bound must pick one of these; there is no
/// global default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownMonthPolicy {
    /// Unknown month resolves to January
    StartOfYear,

    /// Unknown month resolves to December
    EndOfYear,
}

/// A fully resolved year and month
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    /// Calendar year
    pub year: i32,
    /// Month in [1, 12]
    pub month: u32,
}

impl YearMonth {
    /// Months since year zero, used for arithmetic
    pub fn index(&self) -> i64 {
        i64::from(self.year) * 12 + i64::from(self.month) - 1
    }
}

/// A date with optional year and optional month (no day granularity)
///
/// A month is never stored without a year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "RawPartialDate", into = "RawPartialDate")]
pub struct PartialDate {
    year: Option<i32>,
    month: Option<u32>,
}

impl PartialDate {
    /// Create a partial date from its optional parts
    ///
    /// # Errors
    /// Returns error if the month is outside [1, 12] or given without a year
    pub fn new(year: Option<i32>, month: Option<u32>) -> Result<Self, String> {
        if let Some(m) = month {
            if !(1..=12).contains(&m) {
                return Err(format!("Month must be in [1, 12], got {}", m));
            }
            if year.is_none() {
                return Err("Month cannot be known without a year".to_string());
            }
        }
        Ok(Self { year, month })
    }

    /// A date about which nothing is known
    pub fn unknown() -> Self {
        Self::default()
    }

    /// A year-only date
    pub fn year(year: i32) -> Self {
        Self {
            year: Some(year),
            month: None,
        }
    }

    /// A year and month date
    ///
    /// # Panics
    /// Panics if month is outside [1, 12]
    pub fn year_month(year: i32, month: u32) -> Self {
        assert!((1..=12).contains(&month), "Month must be in [1, 12]");
        Self {
            year: Some(year),
            month: Some(month),
        }
    }

    /// Known year, if any
    pub fn known_year(&self) -> Option<i32> {
        self.year
    }

    /// Known month, if any
    pub fn known_month(&self) -> Option<u32> {
        self.month
    }

    /// Whether the year is known
    pub fn has_year(&self) -> bool {
        self.year.is_some()
    }

    /// Whether both year and month are known
    pub fn is_complete(&self) -> bool {
        self.year.is_some() && self.month.is_some()
    }

    /// The exact year and month, only when both are recorded
    pub fn exact(&self) -> Option<YearMonth> {
        match (self.year, self.month) {
            (Some(year), Some(month)) => Some(YearMonth { year, month }),
            _ => None,
        }
    }

    /// Resolve to a definite year and month under an explicit policy
    ///
    /// Returns `None` when the year is unknown; no policy invents a year.
    pub fn resolve(&self, policy: UnknownMonthPolicy) -> Option<YearMonth> {
        let year = self.year?;
        let month = self.month.unwrap_or(match policy {
            UnknownMonthPolicy::StartOfYear => 1,
            UnknownMonthPolicy::EndOfYear => 12,
        });
        Some(YearMonth { year, month })
    }

    /// Compare using the available fields only
    ///
    /// Within one year, a missing month on either side is `Indeterminate`, as
    /// is any comparison involving an unknown year. `Same` requires both dates
    /// to be complete.
    pub fn compare(&self, other: &PartialDate) -> DateOrdering {
        let (Some(y1), Some(y2)) = (self.year, other.year) else {
            return DateOrdering::Indeterminate;
        };

        if let (Some(m1), Some(m2)) = (self.month, other.month) {
            return ordering_of((y1, m1).cmp(&(y2, m2)));
        }

        if y1 != y2 {
            return ordering_of(y1.cmp(&y2));
        }

        DateOrdering::Indeterminate
    }

    /// Whether this date is provably strictly before `other`
    pub fn is_before(&self, other: &PartialDate) -> bool {
        self.compare(other) == DateOrdering::Before
    }

    /// Whether this date is provably strictly after `other`
    pub fn is_after(&self, other: &PartialDate) -> bool {
        self.compare(other) == DateOrdering::After
    }

    /// Signed number of months from `self` to `other`
    ///
    /// `None` unless both dates carry year and month; never an approximation.
    pub fn months_until(&self, other: &PartialDate) -> Option<i64> {
        let from = self.exact()?;
        let to = other.exact()?;
        Some(to.index() - from.index())
    }
}

fn ordering_of(ordering: std::cmp::Ordering) -> DateOrdering {
    match ordering {
        std::cmp::Ordering::Less => DateOrdering::Before,
        std::cmp::Ordering::Greater => DateOrdering::After,
        std::cmp::Ordering::Equal => DateOrdering::Same,
    }
}

/// Compare two partial dates (free-function form of [`PartialDate::compare`])
pub fn compare(a: &PartialDate, b: &PartialDate) -> DateOrdering {
    a.compare(b)
}

/// Exact number of months from `a` to `b`, if determinable
pub fn months_between(a: &PartialDate, b: &PartialDate) -> Option<i64> {
    a.months_until(b)
}

/// Number of months from `a` to `b` after resolving unknown months
///
/// `a` and `b` may take different policies; a caller bounding a duration from
/// above typically resolves the start early and the end late.
pub fn months_between_with_policy(
    a: &PartialDate,
    a_policy: UnknownMonthPolicy,
    b: &PartialDate,
    b_policy: UnknownMonthPolicy,
) -> Option<i64> {
    let from = a.resolve(a_policy)?;
    let to = b.resolve(b_policy)?;
    Some(to.index() - from.index())
}

impl fmt::Display for PartialDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.year, self.month) {
            (Some(y), Some(m)) => write!(f, "{:04}-{:02}", y, m),
            (Some(y), None) => write!(f, "{:04}", y),
            _ => write!(f, "unknown"),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct RawPartialDate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    month: Option<u32>,
}

impl TryFrom<RawPartialDate> for PartialDate {
    type Error = String;

    fn try_from(raw: RawPartialDate) -> Result<Self, Self::Error> {
        PartialDate::new(raw.year, raw.month)
    }
}

impl From<PartialDate> for RawPartialDate {
    fn from(date: PartialDate) -> Self {
        Self {
            year: date.year,
            month: date.month,
        }
    }
}
