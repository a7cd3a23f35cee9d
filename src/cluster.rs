//! Day bucketing and overlap clustering.
//!
//! Groups instances by the calendar days they touch, clips multi-day
//! instances to each day, and partitions every day's segments into
//! maximal transitive-overlap clusters with a single interval sweep.

use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::instance::{DaySegment, EventInstance};

/// Per-day overlap clusters, keyed by calendar date in order.
pub type DayClusters = BTreeMap<NaiveDate, Vec<Cluster>>;

/// A maximal set of same-day segments whose intervals transitively overlap.
///
/// Segments are held in the engine's canonical order: start ascending,
/// then longer duration first, then instance key. Layout relies on this
/// order for deterministic column assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    pub segments: Vec<DaySegment>,
}

impl Cluster {
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// Partition `instances` into per-day overlap clusters.
///
/// Deterministic: the same instance set, in any input order, produces the
/// same clusters in the same order. Days are keyed through a `BTreeMap`
/// and segments carry a total sort order, so no input ordering leaks
/// through.
pub fn build_clusters(instances: &[EventInstance]) -> DayClusters {
    let mut by_day: BTreeMap<NaiveDate, Vec<DaySegment>> = BTreeMap::new();
    for instance in instances {
        for date in instance.days() {
            if let Some(segment) = instance.clip_to_day(date) {
                by_day.entry(date).or_default().push(segment);
            }
        }
    }

    let mut clusters = DayClusters::new();
    for (date, mut segments) in by_day {
        sort_segments(&mut segments);
        clusters.insert(date, sweep(segments));
    }
    clusters
}

/// Canonical segment order: start ascending, longer first, key as the
/// final tie-break so equal intervals still sort totally.
fn sort_segments(segments: &mut [DaySegment]) {
    segments.sort_by(|a, b| {
        a.start
            .cmp(&b.start)
            .then_with(|| b.duration().cmp(&a.duration()))
            .then_with(|| a.key().cmp(&b.key()))
    });
}

/// Interval sweep over sorted segments: keep the running max end; a
/// segment starting at or after it opens a new cluster.
fn sweep(segments: Vec<DaySegment>) -> Vec<Cluster> {
    let mut clusters = Vec::new();
    let mut current: Vec<DaySegment> = Vec::new();
    let mut active_end = None;

    for segment in segments {
        match active_end {
            Some(end) if segment.start < end => {
                active_end = Some(segment.end.max(end));
                current.push(segment);
            }
            _ => {
                if !current.is_empty() {
                    clusters.push(Cluster {
                        segments: std::mem::take(&mut current),
                    });
                }
                active_end = Some(segment.end);
                current.push(segment);
            }
        }
    }
    if !current.is_empty() {
        clusters.push(Cluster { segments: current });
    }
    clusters
}
