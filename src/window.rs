//! Query window for expanding and laying out events.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CalGridError, CalGridResult};

/// Half-open query window `[start, end)` in which instances are materialized.
///
/// The window is the recurrence horizon: expansion never generates
/// occurrences past `end`, so an unbounded rule stays finite. Construction
/// enforces a maximum span so an over-wide request fails fast instead of
/// producing an unbounded expansion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QueryWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl QueryWindow {
    /// Build a window, rejecting empty/inverted ranges and spans over `max_days`.
    pub fn new(
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        max_days: i64,
    ) -> CalGridResult<Self> {
        if end <= start {
            return Err(CalGridError::InvalidWindow(format!(
                "window end {} is not after start {}",
                end, start
            )));
        }
        let span = end - start;
        if span > Duration::days(max_days) {
            // Partial days count: report the span rounded up.
            let days = span.num_days()
                + if span > Duration::days(span.num_days()) { 1 } else { 0 };
            return Err(CalGridError::WindowTooLarge { days, max_days });
        }
        Ok(QueryWindow { start, end })
    }

    /// Window covering whole calendar days `[from, to]` (both inclusive).
    pub fn for_dates(from: NaiveDate, to: NaiveDate, max_days: i64) -> CalGridResult<Self> {
        let start = day_start(from);
        let end = day_start(to) + Duration::days(1);
        QueryWindow::new(start, end, max_days)
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Whether `[from, to)` intersects this window.
    pub fn overlaps(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> bool {
        from < self.end && to > self.start
    }

    /// Calendar days touched by the window, in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        let first = self.start.date_naive();
        // `end` is exclusive: a window ending exactly at midnight does not
        // include that day.
        let last = (self.end - Duration::nanoseconds(1)).date_naive();
        std::iter::successors(Some(first), move |d| {
            d.succ_opt().filter(|next| *next <= last)
        })
    }
}

/// Midnight UTC at the start of `date`.
pub(crate) fn day_start(date: NaiveDate) -> DateTime<Utc> {
    date.and_hms_opt(0, 0, 0).unwrap().and_utc()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_rejects_inverted_window() {
        let start = Utc.with_ymd_and_hms(2025, 6, 2, 0, 0, 0).unwrap();
        let result = QueryWindow::new(start, start, 366);
        assert!(matches!(result, Err(CalGridError::InvalidWindow(_))));
    }

    #[test]
    fn test_rejects_window_over_max_span() {
        let start = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2027, 1, 1, 0, 0, 0).unwrap();
        match QueryWindow::new(start, end, 366) {
            Err(CalGridError::WindowTooLarge { days, max_days }) => {
                assert_eq!(days, 730);
                assert_eq!(max_days, 366);
            }
            other => panic!("Expected WindowTooLarge, got {:?}", other),
        }
    }

    #[test]
    fn test_partial_day_over_max_span_is_rejected() {
        let start = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();

        // Exactly max_days is fine.
        let end = start + Duration::days(366);
        assert!(QueryWindow::new(start, end, 366).is_ok());

        // One hour past it is not, and the partial day counts.
        let end = start + Duration::days(366) + Duration::hours(1);
        match QueryWindow::new(start, end, 366) {
            Err(CalGridError::WindowTooLarge { days, max_days }) => {
                assert_eq!(days, 367);
                assert_eq!(max_days, 366);
            }
            other => panic!("Expected WindowTooLarge, got {:?}", other),
        }
    }

    #[test]
    fn test_days_excludes_exclusive_midnight_end() {
        let window = QueryWindow::new(
            Utc.with_ymd_and_hms(2025, 6, 2, 12, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 6, 4, 0, 0, 0).unwrap(),
            366,
        )
        .unwrap();
        let days: Vec<_> = window.days().collect();
        assert_eq!(
            days,
            vec![
                NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
                NaiveDate::from_ymd_opt(2025, 6, 3).unwrap(),
            ],
            "June 4 starts exactly at the exclusive end and must not appear"
        );
    }

    #[test]
    fn test_for_dates_is_inclusive_of_both_endpoints() {
        let from = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        let to = NaiveDate::from_ymd_opt(2025, 6, 4).unwrap();
        let window = QueryWindow::for_dates(from, to, 366).unwrap();
        assert_eq!(window.days().count(), 3);
        assert_eq!(window.end(), Utc.with_ymd_and_hms(2025, 6, 5, 0, 0, 0).unwrap());
    }
}
