//! CRM-neutral calendar event types.
//!
//! These are immutable snapshots handed to the engine by the persistence
//! collaborator. The engine never mutates them; derived values
//! (instances, layout slots) are recomputed per query.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::recurrence::RecurrenceRule;

/// Opaque event identity, unique per stored event.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(String);

impl EventId {
    /// Generate a fresh random id for a newly created event.
    pub fn new() -> Self {
        EventId(uuid::Uuid::new_v4().to_string())
    }

    pub fn from_string(id: impl Into<String>) -> Self {
        EventId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for EventId {
    fn default() -> Self {
        EventId::new()
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A calendar event as stored by the CRM.
///
/// The time interval is half-open: `[start, end)`. An event that ends at
/// midnight does not occupy the following day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: EventId,
    pub title: String,
    pub description: Option<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub category: EventCategory,
    pub status: EventStatus,
    pub priority: Option<EventPriority>,
    /// Who the event is assigned to, if anyone.
    pub assignee: Option<Assignee>,
    pub department: Option<String>,
    pub location: Option<String>,
    /// Recurrence rule for master events; `None` for one-off events.
    pub recurrence: Option<RecurrenceRule>,
}

impl CalendarEvent {
    /// Duration of the base event, applied unchanged to every occurrence.
    pub fn duration(&self) -> chrono::Duration {
        self.end - self.start
    }

    /// Whether `[start, end)` intersects the half-open range `[from, to)`.
    pub fn overlaps(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> bool {
        self.start < to && self.end > from
    }
}

/// Canonical event categories.
///
/// Stored data with a category outside this set deserializes to `Other`
/// and renders with the default style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventCategory {
    Meeting,
    Call,
    Task,
    FollowUp,
    Deadline,
    Personal,
    Other,
}

impl<'de> Deserialize<'de> for EventCategory {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(EventCategory::parse_lossy(&raw))
    }
}

impl EventCategory {
    /// Map a stored category string onto the canonical set. Anything
    /// unrecognized lands on `Other` rather than failing deserialization.
    pub fn parse_lossy(raw: &str) -> Self {
        match raw {
            "meeting" => EventCategory::Meeting,
            "call" => EventCategory::Call,
            "task" => EventCategory::Task,
            "follow_up" => EventCategory::FollowUp,
            "deadline" => EventCategory::Deadline,
            "personal" => EventCategory::Personal,
            _ => EventCategory::Other,
        }
    }

    /// Default render color for this category (hex RGB).
    pub fn default_color(&self) -> &'static str {
        match self {
            EventCategory::Meeting => "#3b82f6",
            EventCategory::Call => "#10b981",
            EventCategory::Task => "#f59e0b",
            EventCategory::FollowUp => "#8b5cf6",
            EventCategory::Deadline => "#ef4444",
            EventCategory::Personal => "#14b8a6",
            EventCategory::Other => "#6b7280",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Confirmed,
    Tentative,
    Cancelled,
}

impl Default for EventStatus {
    fn default() -> Self {
        EventStatus::Confirmed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventPriority {
    High,
    Medium,
    Low,
}

/// Assignment target for an event: a single user or a whole team.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Assignee {
    pub kind: AssigneeKind,
    pub id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssigneeKind {
    User,
    Team,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_category_falls_back_to_other() {
        let category: EventCategory = serde_json::from_str(r#""sprint_review""#)
            .expect("Unknown category should deserialize");
        assert_eq!(category, EventCategory::Other);
        assert_eq!(category.default_color(), "#6b7280");
    }

    #[test]
    fn test_known_category_roundtrip() {
        let json = serde_json::to_string(&EventCategory::FollowUp).unwrap();
        assert_eq!(json, r#""follow_up""#);
        let back: EventCategory = serde_json::from_str(&json).unwrap();
        assert_eq!(back, EventCategory::FollowUp);
    }

    #[test]
    fn test_overlap_is_half_open() {
        use chrono::TimeZone;
        let event = CalendarEvent {
            id: EventId::from_string("e1"),
            title: "Standup".into(),
            description: None,
            start: Utc.with_ymd_and_hms(2025, 6, 2, 9, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2025, 6, 2, 10, 0, 0).unwrap(),
            category: EventCategory::Meeting,
            status: EventStatus::Confirmed,
            priority: None,
            assignee: None,
            department: None,
            location: None,
            recurrence: None,
        };

        // Touching at the boundary does not overlap
        let ten = Utc.with_ymd_and_hms(2025, 6, 2, 10, 0, 0).unwrap();
        let eleven = Utc.with_ymd_and_hms(2025, 6, 2, 11, 0, 0).unwrap();
        assert!(!event.overlaps(ten, eleven), "[10,11) must not overlap [9,10)");

        let nine_thirty = Utc.with_ymd_and_hms(2025, 6, 2, 9, 30, 0).unwrap();
        assert!(event.overlaps(nine_thirty, eleven));
    }
}
