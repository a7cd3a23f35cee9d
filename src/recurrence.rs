//! Recurrence rule expansion.
//!
//! Expands a master event into concrete instances within a query window,
//! respecting exception dates. Expansion is a pure function of its inputs:
//! identical event + window always yields the identical instance sequence.
//!
//! The rule model is deliberately simpler than RFC 5545: four frequencies,
//! an interval, an inclusive end date, exception dates and an optional
//! weekday subset for weekly rules. One semantic difference is prescribed:
//! a monthly/yearly rule anchored on a day the target month lacks *clamps*
//! to the month's last day (Jan 31 → Feb 28) instead of skipping the month.

use chrono::{Datelike, Duration, Months, NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::warn;

use crate::error::{CalGridError, CalGridResult};
use crate::event::CalendarEvent;
use crate::instance::EventInstance;
use crate::window::QueryWindow;

/// Recurrence step unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

/// A recurrence rule attached to a master event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurrenceRule {
    pub frequency: Frequency,
    /// Every N frequency units. Must be ≥ 1.
    #[serde(default = "default_interval")]
    pub interval: u32,
    /// Last calendar date (inclusive) on which an occurrence may start.
    pub end_date: Option<NaiveDate>,
    /// Calendar dates to skip entirely.
    #[serde(default)]
    pub exception_dates: BTreeSet<NaiveDate>,
    /// For weekly rules: emit these weekdays within each selected week.
    /// Ignored for other frequencies.
    pub weekdays: Option<Vec<Weekday>>,
}

fn default_interval() -> u32 {
    1
}

impl RecurrenceRule {
    pub fn new(frequency: Frequency) -> Self {
        RecurrenceRule {
            frequency,
            interval: 1,
            end_date: None,
            exception_dates: BTreeSet::new(),
            weekdays: None,
        }
    }

    /// Validate the rule against its base event's start date.
    ///
    /// `interval == 0` and an end date before the base start are data
    /// errors: the expander refuses them rather than looping or silently
    /// producing nothing.
    pub fn validate(&self, base_start: NaiveDate) -> CalGridResult<()> {
        if self.interval == 0 {
            return Err(CalGridError::InvalidRecurrence(
                "interval must be at least 1".into(),
            ));
        }
        if let Some(end) = self.end_date {
            if end < base_start {
                return Err(CalGridError::InvalidRecurrence(format!(
                    "end date {} precedes event start date {}",
                    end, base_start
                )));
            }
        }
        Ok(())
    }
}

/// Expand `event` into the instances whose intervals intersect `window`.
///
/// - Without a rule, yields the base event itself iff it overlaps the window.
/// - With a rule, steps from the base start date by `interval` frequency
///   units, stopping at the earlier of the window end and the rule's end
///   date. Every occurrence keeps the base event's clock time-of-day and
///   duration; only the calendar date shifts.
/// - Occurrences whose start date is in `exception_dates` are skipped.
///
/// A zero interval is rejected with [`CalGridError::InvalidRecurrence`]
/// unless `clamp_zero_interval` is set, in which case it is clamped to 1
/// and a warning is logged.
pub fn expand(
    event: &CalendarEvent,
    window: &QueryWindow,
    clamp_zero_interval: bool,
) -> CalGridResult<Vec<EventInstance>> {
    let rule = match &event.recurrence {
        Some(r) => r,
        None => {
            if event.overlaps(window.start(), window.end()) {
                return Ok(vec![EventInstance::base(event)]);
            }
            return Ok(Vec::new());
        }
    };

    let base_date = event.start.date_naive();

    let interval = if rule.interval == 0 {
        if !clamp_zero_interval {
            return Err(CalGridError::InvalidRecurrence(
                "interval must be at least 1".into(),
            ));
        }
        warn!(event_id = %event.id, "recurrence interval 0 clamped to 1");
        1
    } else {
        rule.interval
    };
    if let Some(end) = rule.end_date {
        if end < base_date {
            return Err(CalGridError::InvalidRecurrence(format!(
                "end date {} precedes event start date {}",
                end, base_date
            )));
        }
    }

    // Horizon: last calendar date an occurrence may start on. The window
    // end is exclusive, so the day it lands on is still reachable by an
    // occurrence starting earlier that day.
    let window_last = (window.end() - Duration::nanoseconds(1)).date_naive();
    let horizon = match rule.end_date {
        Some(end) => end.min(window_last),
        None => window_last,
    };

    let time_of_day = event.start.time();
    let duration = event.duration();
    let mut instances = Vec::new();

    match (rule.frequency, &rule.weekdays) {
        (Frequency::Weekly, Some(days)) if !days.is_empty() => {
            // Every Nth week, emit each selected weekday within that week.
            // Weeks start on Monday; occurrences before the base start are
            // not part of the series.
            let mut week = base_date.week(Weekday::Mon).first_day();
            while week <= horizon {
                for offset in 0..7 {
                    let date = week + Duration::days(offset);
                    let weekday = date.weekday();
                    if !days.contains(&weekday) {
                        continue;
                    }
                    if date < base_date || date > horizon {
                        continue;
                    }
                    push_occurrence(
                        &mut instances,
                        event,
                        rule,
                        date,
                        time_of_day,
                        duration,
                        window,
                    );
                }
                week += Duration::weeks(interval as i64);
            }
        }
        _ => {
            let mut step: u32 = 0;
            loop {
                let date = match occurrence_date(base_date, rule.frequency, interval, step) {
                    Some(d) => d,
                    // Date arithmetic overflow: past the representable range.
                    None => break,
                };
                if date > horizon {
                    break;
                }
                push_occurrence(
                    &mut instances,
                    event,
                    rule,
                    date,
                    time_of_day,
                    duration,
                    window,
                );
                step += 1;
            }
        }
    }

    Ok(instances)
}

/// The step'th occurrence date for a rule anchored at `base`.
///
/// Month and year steps clamp the anchor's day-of-month to the last valid
/// day of the target month. The clamp is applied from the anchor each time,
/// so a rule on the 31st emits Feb 28 and then Mar 31 again.
fn occurrence_date(
    base: NaiveDate,
    frequency: Frequency,
    interval: u32,
    step: u32,
) -> Option<NaiveDate> {
    let n = interval.checked_mul(step)?;
    match frequency {
        Frequency::Daily => base.checked_add_days(chrono::Days::new(n as u64)),
        Frequency::Weekly => base.checked_add_days(chrono::Days::new(7 * n as u64)),
        Frequency::Monthly => base.checked_add_months(Months::new(n)),
        Frequency::Yearly => base.checked_add_months(Months::new(n.checked_mul(12)?)),
    }
}

fn push_occurrence(
    instances: &mut Vec<EventInstance>,
    event: &CalendarEvent,
    rule: &RecurrenceRule,
    date: NaiveDate,
    time_of_day: NaiveTime,
    duration: Duration,
    window: &QueryWindow,
) {
    if rule.exception_dates.contains(&date) {
        return;
    }
    let start = date.and_time(time_of_day).and_utc();
    let end = start + duration;
    if !window.overlaps(start, end) {
        return;
    }
    let is_base = date == event.start.date_naive();
    instances.push(EventInstance::occurrence(event, start, end, !is_base));
}
