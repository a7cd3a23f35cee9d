//! Day-view column layout.
//!
//! Assigns each segment of an overlap cluster a column so overlapping
//! events render side by side. Greedy first-fit over the cluster's
//! canonical order; since interval graphs are perfect, the resulting
//! column count equals the cluster's maximum concurrent overlap.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::cluster::Cluster;
use crate::instance::InstanceKey;

/// Geometry for one segment within its cluster.
///
/// `column` is 0-based and always `< total_columns`; `width` is the
/// fraction of the day column the segment occupies, `1 / total_columns`
/// under the equal-width policy. `total_columns` is identical for every
/// member of a cluster.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutSlot {
    pub column: u32,
    pub width: f64,
    pub total_columns: u32,
}

impl LayoutSlot {
    /// The lone slot of a singleton cluster.
    pub fn full_width() -> Self {
        LayoutSlot {
            column: 0,
            width: 1.0,
            total_columns: 1,
        }
    }
}

/// Assign a column to each segment of `cluster`, in cluster order.
///
/// Pure function: identical cluster contents always produce identical
/// slots. An empty cluster yields an empty vector, not an error.
pub fn layout_cluster(cluster: &Cluster) -> Vec<LayoutSlot> {
    if cluster.is_empty() {
        return Vec::new();
    }

    // columns[i] = end of the interval most recently placed in column i
    let mut columns: Vec<DateTime<Utc>> = Vec::new();
    let mut assigned: Vec<u32> = Vec::with_capacity(cluster.len());

    for segment in &cluster.segments {
        let column = match columns.iter().position(|&end| end <= segment.start) {
            Some(i) => i,
            None => {
                columns.push(segment.end);
                columns.len() - 1
            }
        };
        columns[column] = segment.end;
        assigned.push(column as u32);
    }

    let total_columns = columns.len() as u32;
    let width = 1.0 / total_columns as f64;
    assigned
        .into_iter()
        .map(|column| LayoutSlot {
            column,
            width,
            total_columns,
        })
        .collect()
}

/// Slots keyed by instance for callers addressing segments by identity.
pub fn layout_cluster_by_key(cluster: &Cluster) -> HashMap<InstanceKey, LayoutSlot> {
    layout_cluster(cluster)
        .into_iter()
        .zip(&cluster.segments)
        .map(|(slot, segment)| (segment.key(), slot))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::build_clusters;
    use crate::event::{CalendarEvent, EventCategory, EventId, EventStatus};
    use crate::instance::EventInstance;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn instance(id: &str, start: (u32, u32), end: (u32, u32)) -> EventInstance {
        let make = |(h, m): (u32, u32)| Utc.with_ymd_and_hms(2025, 6, 2, h, m, 0).unwrap();
        EventInstance::base(&CalendarEvent {
            id: EventId::from_string(id),
            title: id.to_string(),
            description: None,
            start: make(start),
            end: make(end),
            category: EventCategory::Meeting,
            status: EventStatus::Confirmed,
            priority: None,
            assignee: None,
            department: None,
            location: None,
            recurrence: None,
        })
    }

    fn single_cluster(instances: &[EventInstance]) -> Cluster {
        let clusters = build_clusters(instances);
        let day = &clusters[&NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()];
        assert_eq!(day.len(), 1, "test fixture expects one cluster");
        day[0].clone()
    }

    #[test]
    fn test_singleton_cluster_is_full_width() {
        let cluster = single_cluster(&[instance("a", (9, 0), (10, 0))]);
        let slots = layout_cluster(&cluster);
        assert_eq!(slots, vec![LayoutSlot::full_width()]);
    }

    #[test]
    fn test_empty_cluster_is_a_noop() {
        let cluster = Cluster { segments: Vec::new() };
        assert!(layout_cluster(&cluster).is_empty());
    }

    #[test]
    fn test_column_reuse_after_earlier_event_ends() {
        // A(9:00-10:00), B(9:30-10:30), C(10:15-10:45): A/B overlap, C
        // overlaps only B and reuses A's freed column 0. Two columns total.
        let cluster = single_cluster(&[
            instance("a", (9, 0), (10, 0)),
            instance("b", (9, 30), (10, 30)),
            instance("c", (10, 15), (10, 45)),
        ]);
        let slots = layout_cluster_by_key(&cluster);
        assert_eq!(slots.len(), 3);

        let slot_of = |title: &str| {
            let segment = cluster
                .segments
                .iter()
                .find(|s| s.instance.event.title == title)
                .unwrap();
            slots[&segment.key()]
        };

        assert_eq!(slot_of("a").column, 0);
        assert_eq!(slot_of("b").column, 1);
        assert_eq!(slot_of("c").column, 0, "C reuses the column A vacated");
        for title in ["a", "b", "c"] {
            assert_eq!(slot_of(title).total_columns, 2);
            assert!((slot_of(title).width - 0.5).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn test_overlapping_segments_get_distinct_columns() {
        let cluster = single_cluster(&[
            instance("a", (9, 0), (11, 0)),
            instance("b", (9, 30), (10, 30)),
            instance("c", (10, 0), (10, 45)),
        ]);
        let slots = layout_cluster(&cluster);

        for i in 0..cluster.len() {
            for j in (i + 1)..cluster.len() {
                let (a, b) = (&cluster.segments[i], &cluster.segments[j]);
                if a.start < b.end && b.start < a.end {
                    assert_ne!(
                        slots[i].column, slots[j].column,
                        "overlapping '{}' and '{}' share a column",
                        a.instance.event.title, b.instance.event.title
                    );
                }
            }
        }
    }

    #[test]
    fn test_every_segment_gets_exactly_one_slot_within_bounds() {
        let cluster = single_cluster(&[
            instance("a", (9, 0), (10, 0)),
            instance("b", (9, 0), (10, 0)),
            instance("c", (9, 0), (10, 0)),
            instance("d", (9, 45), (10, 30)),
        ]);
        let slots = layout_cluster(&cluster);
        assert_eq!(slots.len(), cluster.len(), "one slot per segment");
        for slot in &slots {
            assert!(slot.column < slot.total_columns);
            assert!(slot.width > 0.0 && slot.width <= 1.0);
        }
    }

    #[test]
    fn test_equal_starts_assign_columns_in_cluster_order() {
        // Equal start and duration: the id tie-break decides, so "a" takes
        // column 0 regardless of input order.
        let cluster = single_cluster(&[
            instance("b", (9, 0), (10, 0)),
            instance("a", (9, 0), (10, 0)),
        ]);
        assert_eq!(cluster.segments[0].instance.event.title, "a");
        let slots = layout_cluster(&cluster);
        assert_eq!(slots[0].column, 0);
        assert_eq!(slots[1].column, 1);
    }

    #[test]
    fn test_layout_is_idempotent() {
        let cluster = single_cluster(&[
            instance("a", (9, 0), (10, 0)),
            instance("b", (9, 30), (10, 30)),
            instance("c", (10, 15), (10, 45)),
        ]);
        assert_eq!(
            layout_cluster(&cluster),
            layout_cluster(&cluster),
            "layout is a pure function of cluster contents"
        );
    }
}
