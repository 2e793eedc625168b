//! Counter handles and their per-label accumulators.
//!
//! A `Counter` is a cheaply clonable handle; all clones share the same
//! accumulators. Values are monotone f64 sums stored as raw bits in an
//! `AtomicU64` and updated with a CAS loop, so concurrent `add` calls from
//! request handlers never lose updates and never take a lock.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;

use crate::error::{Error, Result};
use crate::label::LabelSet;
use crate::snapshot::{CounterSeries, SeriesPoint};

/// f64 accumulator stored as raw bits.
#[derive(Debug, Default)]
struct F64Cell(AtomicU64);

impl F64Cell {
    fn add(&self, delta: f64) {
        // fetch_update retries the CAS until no concurrent writer interferes.
        let _ = self
            .0
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |bits| {
                Some((f64::from_bits(bits) + delta).to_bits())
            });
    }

    fn get(&self) -> f64 {
        f64::from_bits(self.0.load(Ordering::Acquire))
    }
}

#[derive(Debug)]
struct CounterInner {
    name: String,
    description: String,
    unit: String,
    points: DashMap<LabelSet, F64Cell>,
}

/// Handle to a named counter held by a registry.
#[derive(Debug, Clone)]
pub struct Counter {
    inner: Arc<CounterInner>,
}

impl Counter {
    pub(crate) fn new(name: &str, description: &str, unit: &str) -> Self {
        Self {
            inner: Arc::new(CounterInner {
                name: name.to_string(),
                description: description.to_string(),
                unit: unit.to_string(),
                points: DashMap::new(),
            }),
        }
    }

    /// Metric name (registry identity).
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Human-readable description.
    pub fn description(&self) -> &str {
        &self.inner.description
    }

    /// Unit annotation carried into snapshots.
    pub fn unit(&self) -> &str {
        &self.inner.unit
    }

    /// Add `delta` to the accumulator tracked under `labels`.
    ///
    /// Counters are monotone: negative and non-finite deltas are rejected
    /// without touching any accumulator. A zero delta is a no-op sum-wise
    /// but still registers the label set.
    pub fn add(&self, labels: &LabelSet, delta: f64) -> Result<()> {
        if !delta.is_finite() || delta < 0.0 {
            return Err(Error::InvalidDelta { delta });
        }
        if let Some(cell) = self.inner.points.get(labels) {
            cell.add(delta);
            return Ok(());
        }
        self.inner
            .points
            .entry(labels.clone())
            .or_insert_with(F64Cell::default)
            .add(delta);
        Ok(())
    }

    /// Increment by 1.
    pub fn inc(&self, labels: &LabelSet) -> Result<()> {
        self.add(labels, 1.0)
    }

    /// Current value under one label set; 0.0 when never incremented.
    pub fn value(&self, labels: &LabelSet) -> f64 {
        self.inner
            .points
            .get(labels)
            .map(|cell| cell.get())
            .unwrap_or(0.0)
    }

    /// Capture every accumulator into an owned series, sorted by label set
    /// for deterministic output.
    pub(crate) fn collect(&self) -> CounterSeries {
        let mut points: Vec<SeriesPoint> = self
            .inner
            .points
            .iter()
            .map(|entry| SeriesPoint {
                labels: entry.key().clone(),
                value: entry.value().get(),
            })
            .collect();
        points.sort_by(|a, b| a.labels.cmp(&b.labels));
        CounterSeries {
            name: self.inner.name.clone(),
            description: self.inner.description.clone(),
            unit: self.inner.unit.clone(),
            points,
        }
    }
}
