//! Predicate filtering over expanded instances.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::event::{Assignee, EventCategory, EventPriority, EventStatus};
use crate::instance::{DaySegment, EventInstance};

/// A bundle of optional predicates, ANDed together.
///
/// Every dimension is independently optional; an absent dimension matches
/// everything. The filter is a pure function of an instance and carries
/// no state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventFilter {
    /// Match events in any of these categories.
    pub categories: Option<BTreeSet<EventCategory>>,
    /// Match events with any of these priorities. Events without a
    /// priority never match a non-empty set.
    pub priorities: Option<BTreeSet<EventPriority>>,
    pub statuses: Option<BTreeSet<EventStatus>>,
    /// Match instances whose interval overlaps `[from, to)`.
    pub range: Option<(DateTime<Utc>, DateTime<Utc>)>,
    /// Case-insensitive substring over title and description. No token
    /// stemming, no fuzzy matching.
    pub search: Option<String>,
    /// Match events assigned to exactly this target.
    pub assignee: Option<Assignee>,
    /// Match on assignment presence: `Some(true)` keeps only assigned
    /// events, `Some(false)` only unassigned ones.
    pub assigned: Option<bool>,
}

impl EventFilter {
    /// A filter with every dimension absent; matches everything.
    pub fn any() -> Self {
        EventFilter::default()
    }

    pub fn is_empty(&self) -> bool {
        *self == EventFilter::default()
    }

    /// Whether `instance` satisfies every present dimension, with the
    /// range dimension checked against the instance's full interval.
    pub fn matches(&self, instance: &EventInstance) -> bool {
        self.matches_interval(instance, instance.start, instance.end)
    }

    /// Whether a day-clipped segment satisfies every present dimension.
    ///
    /// The range dimension is checked against the clipped interval, so a
    /// multi-day event only matches on the days its clip actually
    /// overlaps the range.
    pub fn matches_segment(&self, segment: &DaySegment) -> bool {
        self.matches_interval(&segment.instance, segment.start, segment.end)
    }

    fn matches_interval(
        &self,
        instance: &EventInstance,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> bool {
        let event = &instance.event;

        if let Some(categories) = &self.categories {
            if !categories.contains(&event.category) {
                return false;
            }
        }

        if let Some(priorities) = &self.priorities {
            match event.priority {
                Some(p) if priorities.contains(&p) => {}
                _ => return false,
            }
        }

        if let Some(statuses) = &self.statuses {
            if !statuses.contains(&event.status) {
                return false;
            }
        }

        // Overlap, not containment: touching the range counts.
        if let Some((from, to)) = self.range {
            if !(start < to && end > from) {
                return false;
            }
        }

        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            if !needle.is_empty() {
                let in_title = event.title.to_lowercase().contains(&needle);
                let in_description = event
                    .description
                    .as_deref()
                    .is_some_and(|d| d.to_lowercase().contains(&needle));
                if !in_title && !in_description {
                    return false;
                }
            }
        }

        if let Some(assignee) = &self.assignee {
            if event.assignee.as_ref() != Some(assignee) {
                return false;
            }
        }

        if let Some(assigned) = self.assigned {
            if event.assignee.is_some() != assigned {
                return false;
            }
        }

        true
    }

    /// Keep the matching instances, preserving input order.
    pub fn apply(&self, instances: &[EventInstance]) -> Vec<EventInstance> {
        instances
            .iter()
            .filter(|i| self.matches(i))
            .cloned()
            .collect()
    }
}
