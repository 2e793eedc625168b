//! Shared application state for the demo HTTP app.
//!
//! Holds the registry handle, the request counter every page handler
//! increments, and the draining flag `/readyz` reports on.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use pulsegate_core::counter::Counter;
use pulsegate_core::registry::MetricRegistry;

/// Name of the request counter recorded by every page handler.
pub const REQUESTS_METRIC: &str = "app_requests_total";
const REQUESTS_DESCRIPTION: &str = "Requests handled by the demo app";
const REQUESTS_UNIT: &str = "requests";

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    registry: Arc<MetricRegistry>,
    requests: Counter,
    service: String,
    draining: AtomicBool,
}

impl AppState {
    /// Build application state. Registers the request counter up front so
    /// every handler clone shares one set of accumulators.
    pub fn new(registry: Arc<MetricRegistry>, service: String) -> Self {
        let requests = registry.counter(REQUESTS_METRIC, REQUESTS_DESCRIPTION, REQUESTS_UNIT);
        Self {
            inner: Arc::new(AppStateInner {
                registry,
                requests,
                service,
                draining: AtomicBool::new(false),
            }),
        }
    }

    pub fn registry(&self) -> &MetricRegistry {
        &self.inner.registry
    }

    pub fn requests(&self) -> &Counter {
        &self.inner.requests
    }

    /// Service name used as the `service` label value on request points.
    pub fn service(&self) -> &str {
        &self.inner.service
    }

    /// Mark draining state.
    pub fn set_draining(&self) {
        self.inner.draining.store(true, Ordering::Relaxed);
    }

    /// Return whether draining is active.
    pub fn is_draining(&self) -> bool {
        self.inner.draining.load(Ordering::Relaxed)
    }
}
