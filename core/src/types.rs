//! Shared primitive types used across the entire pipeline.

use chrono::{Datelike, NaiveDate};

/// A calendar period key: (year, month). Month is 1–12.
///
/// Period matching is always done on this tuple, never on full dates —
/// a month bucket and a timestamp must land in the same period even when
/// their canonical representations differ.
pub type YearMonth = (i32, u32);

/// Monotonic per-run event sequence number.
pub type EventSeq = u64;

/// Extract the (year, month) period key from a calendar date.
pub fn year_month(date: NaiveDate) -> YearMonth {
    (date.year(), date.month())
}

/// First day of the month containing `date`.
pub fn month_floor(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1)
        .unwrap_or(date)
}
