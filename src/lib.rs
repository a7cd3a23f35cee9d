//! Calendar event scheduling and day-view layout engine.
//!
//! `calgrid` is the algorithmic core of a CRM calendar. It takes immutable
//! [`CalendarEvent`] snapshots from a persistence collaborator and turns
//! them into render-ready day views:
//!
//! 1. [`recurrence::expand`] materializes the occurrences of each event
//!    that intersect a [`QueryWindow`], stepping daily/weekly/monthly/yearly
//!    rules with exception dates and end-of-month clamping.
//! 2. [`cluster::build_clusters`] clips instances to the days they touch
//!    and partitions each day into maximal overlap clusters with an
//!    interval sweep.
//! 3. [`layout::layout_cluster`] assigns every cluster member a
//!    deterministic column and width so overlapping events render side by
//!    side.
//! 4. [`EventFilter`] narrows the visible set with AND-composed optional
//!    predicates.
//!
//! [`Scheduler::day_views`] runs the whole pipeline. Every stage is a pure
//! function of its inputs: no shared mutable state, safe to call from any
//! number of concurrent query contexts.

pub mod cluster;
pub mod config;
pub mod error;
pub mod event;
pub mod filter;
pub mod instance;
pub mod layout;
pub mod recurrence;
pub mod schedule;
pub mod source;
pub mod window;

pub use cluster::{Cluster, DayClusters, build_clusters};
pub use config::EngineConfig;
pub use error::{CalGridError, CalGridResult};
pub use event::{
    Assignee, AssigneeKind, CalendarEvent, EventCategory, EventId, EventPriority, EventStatus,
};
pub use filter::EventFilter;
pub use instance::{DaySegment, EventInstance, InstanceKey};
pub use layout::{LayoutSlot, layout_cluster, layout_cluster_by_key};
pub use recurrence::{Frequency, RecurrenceRule, expand};
pub use schedule::{DayView, ScheduledEvent, Scheduler};
pub use source::{AssignmentNotifier, EventSource};
pub use window::QueryWindow;
