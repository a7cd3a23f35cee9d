//! End-to-end scheduling pipeline.
//!
//! Wires the engine together: expand recurring events over a window,
//! cluster per day, lay out each cluster, then narrow to the filtered
//! visible set. Everything is recomputed per call; callers own any
//! memoization, keyed on (window, filter, event-set version).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::cluster::build_clusters;
use crate::config::EngineConfig;
use crate::error::CalGridResult;
use crate::event::CalendarEvent;
use crate::filter::EventFilter;
use crate::instance::{DaySegment, EventInstance};
use crate::layout::{LayoutSlot, layout_cluster};
use crate::recurrence::expand;
use crate::source::EventSource;
use crate::window::QueryWindow;

/// One event occurrence positioned on a specific rendering day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledEvent {
    pub segment: DaySegment,
    pub slot: LayoutSlot,
}

/// Everything visible on one calendar day, in canonical order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayView {
    pub date: NaiveDate,
    pub entries: Vec<ScheduledEvent>,
}

/// The scheduling engine facade.
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    config: EngineConfig,
}

impl Scheduler {
    pub fn new(config: EngineConfig) -> Self {
        Scheduler { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Build a window for this engine's configured maximum span.
    pub fn window(
        &self,
        start: chrono::DateTime<chrono::Utc>,
        end: chrono::DateTime<chrono::Utc>,
    ) -> CalGridResult<QueryWindow> {
        QueryWindow::new(start, end, self.config.max_window_days)
    }

    /// Expand every event over the window.
    ///
    /// An event with a malformed rule is logged and skipped; it never
    /// aborts expansion of the rest of the batch.
    pub fn expand_all(
        &self,
        events: &[CalendarEvent],
        window: &QueryWindow,
    ) -> Vec<EventInstance> {
        let mut instances = Vec::new();
        for event in events {
            match expand(event, window, self.config.clamp_zero_interval) {
                Ok(mut expanded) => instances.append(&mut expanded),
                Err(err) => {
                    warn!(event_id = %event.id, %err, "skipping event with invalid recurrence");
                }
            }
        }
        debug!(
            events = events.len(),
            instances = instances.len(),
            "expanded events over window"
        );
        instances
    }

    /// The full pipeline: expand, cluster, lay out, filter.
    ///
    /// Geometry is computed over the whole expanded set; the filter then
    /// narrows the visible entries, so a filtered-out neighbor still
    /// influenced the columns it overlapped. Callers wanting geometry for
    /// the filtered set only should filter first and feed the result to
    /// [`build_clusters`]/[`layout_cluster`] directly.
    pub fn day_views(
        &self,
        events: &[CalendarEvent],
        window: &QueryWindow,
        filter: &EventFilter,
    ) -> Vec<DayView> {
        let instances = self.expand_all(events, window);
        let clusters = build_clusters(&instances);

        let mut views = Vec::new();
        for (date, day_clusters) in clusters {
            let mut entries = Vec::new();
            for cluster in &day_clusters {
                let slots = layout_cluster(cluster);
                for (segment, slot) in cluster.segments.iter().zip(slots) {
                    if filter.matches_segment(segment) {
                        entries.push(ScheduledEvent {
                            segment: segment.clone(),
                            slot,
                        });
                    }
                }
            }
            if !entries.is_empty() {
                views.push(DayView { date, entries });
            }
        }
        views
    }

    /// Load events from a source, then run the pipeline.
    pub async fn day_views_from<S: EventSource + ?Sized>(
        &self,
        source: &S,
        window: &QueryWindow,
        filter: &EventFilter,
    ) -> CalGridResult<Vec<DayView>> {
        let events = source.load_events(window).await?;
        Ok(self.day_views(&events, window, filter))
    }
}
