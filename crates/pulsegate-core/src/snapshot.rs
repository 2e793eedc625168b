//! Point-in-time captures of counter state, ready for export.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

use crate::label::LabelSet;
use crate::resource::Resource;

/// One labeled accumulator value.
#[derive(Debug, Clone, Serialize)]
pub struct SeriesPoint {
    pub labels: LabelSet,
    pub value: f64,
}

/// All points recorded under one counter name.
#[derive(Debug, Clone, Serialize)]
pub struct CounterSeries {
    pub name: String,
    pub description: String,
    pub unit: String,
    pub points: Vec<SeriesPoint>,
}

/// Consistent capture of every counter in a registry.
///
/// Owned data only: increments racing with the capture land in this snapshot
/// or the next, and later increments never mutate an already-taken snapshot.
/// Counters are sorted by name and points by label set, so two captures of
/// identical state serialize identically.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub resource: Resource,
    pub taken_at_ms: u64,
    pub counters: Vec<CounterSeries>,
}

impl Snapshot {
    pub(crate) fn new(resource: Resource, counters: Vec<CounterSeries>) -> Self {
        Self {
            resource,
            taken_at_ms: unix_millis(),
            counters,
        }
    }

    /// Series registered under `name`, if any.
    pub fn series(&self, name: &str) -> Option<&CounterSeries> {
        self.counters.iter().find(|c| c.name == name)
    }

    /// Value captured for `name` under `labels`.
    pub fn value(&self, name: &str, labels: &LabelSet) -> Option<f64> {
        self.series(name)?
            .points
            .iter()
            .find(|p| &p.labels == labels)
            .map(|p| p.value)
    }

    /// Total number of points across all series.
    pub fn total_points(&self) -> usize {
        self.counters.iter().map(|c| c.points.len()).sum()
    }

    /// True when no counter has recorded anything yet.
    pub fn is_empty(&self) -> bool {
        self.total_points() == 0
    }
}

/// Milliseconds since the Unix epoch; 0 if the clock reads before it.
fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
