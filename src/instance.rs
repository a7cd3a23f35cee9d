//! Concrete event occurrences and their per-day clipped views.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::event::{CalendarEvent, EventId};
use crate::window::day_start;

/// One concrete occurrence of a (possibly recurring) event.
///
/// Instances are value objects: expansion creates them, nothing mutates
/// them. They are discarded and regenerated whenever the query window or
/// the source event changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventInstance {
    /// Snapshot of the source event (recurrence stripped, times resolved).
    pub event: CalendarEvent,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// True for occurrences generated by a rule beyond the base date.
    pub is_recurring_instance: bool,
    pub original_event_id: EventId,
}

impl EventInstance {
    /// The base event itself, as its own single occurrence.
    pub fn base(event: &CalendarEvent) -> Self {
        EventInstance::occurrence(event, event.start, event.end, false)
    }

    pub fn occurrence(
        event: &CalendarEvent,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        is_recurring_instance: bool,
    ) -> Self {
        let mut snapshot = event.clone();
        snapshot.start = start;
        snapshot.end = end;
        snapshot.recurrence = None;
        EventInstance {
            event: snapshot,
            start,
            end,
            is_recurring_instance,
            original_event_id: event.id.clone(),
        }
    }

    /// Stable identity across recomputations, usable as a UI key.
    pub fn key(&self) -> InstanceKey {
        InstanceKey {
            event_id: self.original_event_id.clone(),
            date: self.start.date_naive(),
        }
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Calendar days this instance touches, honoring the half-open end:
    /// an instance ending exactly at midnight does not touch that day.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        let first = self.start.date_naive();
        let last = if self.end > self.start {
            (self.end - Duration::nanoseconds(1)).date_naive()
        } else {
            first
        };
        std::iter::successors(Some(first), move |d| {
            d.succ_opt().filter(|next| *next <= last)
        })
    }

    /// Clip this instance to a single calendar day.
    ///
    /// Returns `None` when the instance does not occupy `date` at all.
    /// The clipped interval is `[max(start, 00:00), min(end, next 00:00))`;
    /// `is_start`/`is_end` say whether the clip coincides with the true
    /// boundaries. They are rendering hints only, never geometry inputs.
    pub fn clip_to_day(&self, date: NaiveDate) -> Option<DaySegment> {
        let day_from = day_start(date);
        let day_to = day_from + Duration::days(1);
        if self.start >= day_to || self.end <= day_from {
            return None;
        }
        let start = self.start.max(day_from);
        let end = self.end.min(day_to);
        Some(DaySegment {
            instance: self.clone(),
            date,
            start,
            end,
            is_start: start == self.start,
            is_end: end == self.end,
        })
    }
}

/// `(original event id, occurrence date)` — the stable per-occurrence key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct InstanceKey {
    pub event_id: EventId,
    pub date: NaiveDate,
}

/// An instance clipped to one calendar day's `[00:00, 24:00)` range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySegment {
    pub instance: EventInstance,
    pub date: NaiveDate,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// The clip begins at the instance's true start.
    pub is_start: bool,
    /// The clip ends at the instance's true end.
    pub is_end: bool,
}

impl DaySegment {
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn key(&self) -> InstanceKey {
        self.instance.key()
    }
}
