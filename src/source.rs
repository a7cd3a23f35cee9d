//! Collaborator seams.
//!
//! Persistence and notification live outside the engine and are reached
//! through these narrow traits. The engine never retries or caches
//! across calls to them.

use async_trait::async_trait;

use crate::error::CalGridResult;
use crate::event::{Assignee, CalendarEvent, EventId};
use crate::window::QueryWindow;

/// Persistence collaborator: the system of record for events.
#[async_trait]
pub trait EventSource: Send + Sync {
    /// Load the raw events relevant to `window` (masters included; the
    /// engine expands recurrence itself).
    async fn load_events(&self, window: &QueryWindow) -> CalGridResult<Vec<CalendarEvent>>;

    /// Persist a created or edited event, returning its id.
    async fn save_event(&self, event: &CalendarEvent) -> CalGridResult<EventId>;
}

/// Notification collaborator, invoked when an event is (re)assigned.
#[async_trait]
pub trait AssignmentNotifier: Send + Sync {
    async fn notify_assignment(
        &self,
        event: &CalendarEvent,
        assignee: &Assignee,
    ) -> CalGridResult<()>;
}
