//! Adaptive time bucketing for report totals.
//!
//! The bucket width is picked from the span between the earliest and latest
//! entry in the batch, not from the view window, so a sparse yearly view
//! with entries in a single afternoon is still broken down by hour.

use crate::entities::entry;
use chrono::{NaiveDateTime, TimeDelta};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Bucket width chosen for a batch of entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    /// `"HH:00"`, spans up to one day
    Hour,
    /// `"MMdd"`, spans up to 40 days
    Day,
    /// `"yyMM"`, spans up to 366 days
    Month,
    /// `"yyyy"`, anything longer
    Year,
}

impl Granularity {
    /// Picks the granularity for a span between the earliest and latest timestamp.
    #[must_use]
    pub fn for_span(span: TimeDelta) -> Self {
        if span <= TimeDelta::days(1) {
            Self::Hour
        } else if span <= TimeDelta::days(40) {
            Self::Day
        } else if span <= TimeDelta::days(366) {
            Self::Month
        } else {
            Self::Year
        }
    }

    /// Bucket label of `time` at this granularity.
    #[must_use]
    pub fn label(self, time: &NaiveDateTime) -> String {
        let pattern = match self {
            Self::Hour => "%H:00",
            Self::Day => "%m%d",
            Self::Month => "%y%m",
            Self::Year => "%Y",
        };
        time.format(pattern).to_string()
    }
}

/// Sums entry amounts per time bucket.
///
/// Amounts are summed with their sign and the absolute value of each bucket
/// total is reported, so +100 and -150 in one bucket report 50.
#[must_use]
pub fn sum_by_time(entries: &[entry::Model]) -> BTreeMap<String, Decimal> {
    let Some(granularity) = granularity_of(entries) else {
        return BTreeMap::new();
    };

    let mut buckets: BTreeMap<String, Decimal> = BTreeMap::new();
    for e in entries {
        *buckets.entry(granularity.label(&e.given_time)).or_default() += e.amount;
    }

    buckets.into_iter().map(|(label, sum)| (label, sum.abs())).collect()
}

/// Granularity for a batch, None when the batch is empty.
#[must_use]
pub fn granularity_of(entries: &[entry::Model]) -> Option<Granularity> {
    let earliest = entries.iter().map(|e| e.given_time).min()?;
    let latest = entries.iter().map(|e| e.given_time).max()?;
    Some(Granularity::for_span(latest - earliest))
}
