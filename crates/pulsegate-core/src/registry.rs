//! The metric registry: explicit, shared ownership of every counter.
//!
//! Constructed once at startup and passed by handle (`Arc`) to whatever
//! needs to record or export; there is no global singleton. All operations
//! are safe under concurrent use from request handlers and the exporter.

use dashmap::DashMap;
use tracing::{debug, warn};

use crate::counter::Counter;
use crate::resource::Resource;
use crate::snapshot::Snapshot;

/// Owns every counter of one process plus the resource descriptor.
#[derive(Debug)]
pub struct MetricRegistry {
    resource: Resource,
    counters: DashMap<String, Counter>,
}

impl MetricRegistry {
    /// New empty registry describing the process in `resource`.
    pub fn new(resource: Resource) -> Self {
        Self {
            resource,
            counters: DashMap::new(),
        }
    }

    /// Descriptor attached to every snapshot taken from this registry.
    pub fn resource(&self) -> &Resource {
        &self.resource
    }

    /// Get or create the counter registered under `name`.
    ///
    /// Idempotent: every call with the same name returns a handle to the
    /// same accumulators. The first registration's description and unit win;
    /// a later mismatch is logged and otherwise ignored.
    pub fn counter(&self, name: &str, description: &str, unit: &str) -> Counter {
        if let Some(existing) = self.counters.get(name) {
            if existing.description() != description || existing.unit() != unit {
                warn!(
                    metric = name,
                    "counter re-registered with different metadata, keeping first registration"
                );
            }
            return existing.clone();
        }
        let created = self
            .counters
            .entry(name.to_string())
            .or_insert_with(|| Counter::new(name, description, unit))
            .clone();
        debug!(metric = name, unit, "counter registered");
        created
    }

    /// Point-in-time capture of every counter, sorted by name.
    pub fn snapshot(&self) -> Snapshot {
        let mut counters: Vec<_> = self.counters.iter().map(|e| e.value().collect()).collect();
        counters.sort_by(|a, b| a.name.cmp(&b.name));
        Snapshot::new(self.resource.clone(), counters)
    }
}
