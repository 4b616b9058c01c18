//! Type definitions for datetime bucketing.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::DriftError;

/// Calendar granularity used to bucket a datetime feature.
///
/// Declaration order is coarsest to finest and doubles as the tie-break
/// order of the period selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodUnit {
    Year,
    Quarter,
    Month,
    Week,
    Day,
    Hour,
}

impl PeriodUnit {
    /// All units, coarsest first.
    pub const ALL: [PeriodUnit; 6] = [
        PeriodUnit::Year,
        PeriodUnit::Quarter,
        PeriodUnit::Month,
        PeriodUnit::Week,
        PeriodUnit::Day,
        PeriodUnit::Hour,
    ];

    /// Nominal length in days used to estimate bucket counts.
    pub fn length_in_days(self) -> f64 {
        match self {
            PeriodUnit::Year => 365.0,
            PeriodUnit::Quarter => 90.0,
            PeriodUnit::Month => 30.0,
            PeriodUnit::Week => 7.0,
            PeriodUnit::Day => 1.0,
            PeriodUnit::Hour => 1.0 / 24.0,
        }
    }

    /// Identifier of the unit
    pub fn as_str(self) -> &'static str {
        match self {
            PeriodUnit::Year => "year",
            PeriodUnit::Quarter => "quarter",
            PeriodUnit::Month => "month",
            PeriodUnit::Week => "week",
            PeriodUnit::Day => "day",
            PeriodUnit::Hour => "hour",
        }
    }

    /// Start of the period containing `ts`.
    ///
    /// Weeks start on Monday; quarters on January, April, July and October.
    pub fn floor(self, ts: NaiveDateTime) -> NaiveDateTime {
        let date = ts.date();
        let start = match self {
            PeriodUnit::Year => NaiveDate::from_ymd_opt(date.year(), 1, 1),
            PeriodUnit::Quarter => {
                let month = (date.month0() / 3) * 3 + 1;
                NaiveDate::from_ymd_opt(date.year(), month, 1)
            }
            PeriodUnit::Month => NaiveDate::from_ymd_opt(date.year(), date.month(), 1),
            PeriodUnit::Week => {
                let back = i64::from(date.weekday().num_days_from_monday());
                date.checked_sub_signed(Duration::days(back))
            }
            PeriodUnit::Day => Some(date),
            PeriodUnit::Hour => return date.and_hms_opt(ts.hour(), 0, 0).unwrap_or(ts),
        };
        start.and_then(|d| d.and_hms_opt(0, 0, 0)).unwrap_or(ts)
    }
}

impl fmt::Display for PeriodUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PeriodUnit {
    type Err = DriftError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "year" | "a" | "y" => Ok(PeriodUnit::Year),
            "quarter" | "q" => Ok(PeriodUnit::Quarter),
            "month" | "m" => Ok(PeriodUnit::Month),
            "week" | "w" => Ok(PeriodUnit::Week),
            "day" | "d" => Ok(PeriodUnit::Day),
            "hour" | "h" => Ok(PeriodUnit::Hour),
            other => Err(DriftError::invalid_argument(
                format!("unknown period unit '{other}'"),
                "Use one of: year, quarter, month, week, day, hour",
            )),
        }
    }
}

/// Count of observations starting at a period boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket {
    /// Period start
    pub start: NaiveDateTime,
    /// Observations in the period
    pub count: usize,
}

/// Period-aligned counts for one side of the comparison, ascending by start.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketedSeries {
    buckets: Vec<Bucket>,
}

impl BucketedSeries {
    /// Build from buckets, sorting by period start.
    pub fn new(mut buckets: Vec<Bucket>) -> Self {
        buckets.sort_by_key(|b| b.start);
        Self { buckets }
    }

    pub fn buckets(&self) -> &[Bucket] {
        &self.buckets
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Sum of all counts
    pub fn total(&self) -> usize {
        self.buckets.iter().map(|b| b.count).sum()
    }

    pub fn first(&self) -> Option<&Bucket> {
        self.buckets.first()
    }

    pub fn last(&self) -> Option<&Bucket> {
        self.buckets.last()
    }

    /// Count at `start`, if present
    pub fn count_at(&self, start: NaiveDateTime) -> Option<usize> {
        self.buckets
            .binary_search_by_key(&start, |b| b.start)
            .ok()
            .map(|i| self.buckets[i].count)
    }

    /// Period starts, for plotting
    pub fn starts(&self) -> Vec<NaiveDateTime> {
        self.buckets.iter().map(|b| b.start).collect()
    }

    /// Counts, for plotting
    pub fn counts(&self) -> Vec<usize> {
        self.buckets.iter().map(|b| b.count).collect()
    }

    pub(crate) fn into_buckets(self) -> Vec<Bucket> {
        self.buckets
    }
}

/// Record of a boundary merge between reference and production.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoundaryMerge {
    /// Production's first bucket was folded into reference's last
    IntoReference { start: NaiveDateTime, moved: usize },
    /// Reference's last bucket was folded into production's first
    IntoProduction { start: NaiveDateTime, moved: usize },
}
