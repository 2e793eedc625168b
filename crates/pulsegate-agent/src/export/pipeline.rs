//! The export lifecycle around a registry.
//!
//! States, in order:
//! - connect: bounded dial to the collector; failure aborts startup.
//! - running: one snapshot push per tick; a failed push is logged and the
//!   next tick starts clean.
//! - draining: ticker stopped, one final bounded push; an expired push is
//!   abandoned, never awaited past the timeout.
//! - stopped: transport closed, task joined.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info, warn};

use pulsegate_core::error::Result;
use pulsegate_core::registry::MetricRegistry;

use crate::config::ExporterSection;

use super::transport::{SnapshotTransport, TcpTransport};

/// Outcome of the final drain push.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrainOutcome {
    /// Final snapshot delivered.
    Flushed,
    /// Final push failed; the last window of data is lost.
    SendFailed,
    /// Final push did not finish inside the drain timeout and was abandoned.
    TimedOut,
}

struct DrainRequest {
    timeout: Duration,
    done: oneshot::Sender<DrainOutcome>,
}

/// Extra slack on top of the drain timeout covering request pickup when a
/// tick push is already in flight.
const DRAIN_PICKUP_GRACE: Duration = Duration::from_millis(250);

/// A connected pipeline, ready to start ticking.
pub struct ExportPipeline<T> {
    registry: Arc<MetricRegistry>,
    transport: T,
    interval: Duration,
}

impl ExportPipeline<TcpTransport> {
    /// Connect stage: fail fast. No pipeline without a reachable collector.
    pub async fn connect(cfg: &ExporterSection, registry: Arc<MetricRegistry>) -> Result<Self> {
        let transport = TcpTransport::connect(&cfg.endpoint, cfg.connect_timeout()).await?;
        Ok(Self::with_transport(transport, registry, cfg.interval()))
    }
}

impl<T: SnapshotTransport + 'static> ExportPipeline<T> {
    /// Assemble a pipeline over any transport (integration tests use this
    /// with an in-memory sink).
    pub fn with_transport(transport: T, registry: Arc<MetricRegistry>, interval: Duration) -> Self {
        Self {
            registry,
            transport,
            interval,
        }
    }

    /// Running stage: spawn the export task and hand back its control handle.
    pub fn spawn(self) -> PipelineHandle {
        let (drain_tx, drain_rx) = mpsc::channel(1);
        let task = tokio::spawn(run_loop(
            self.registry,
            self.transport,
            self.interval,
            drain_rx,
        ));
        PipelineHandle { drain_tx, task }
    }
}

/// Control handle for a spawned pipeline. Dropping it without calling
/// [`drain`](Self::drain) stops the export task without a final push.
pub struct PipelineHandle {
    drain_tx: mpsc::Sender<DrainRequest>,
    task: JoinHandle<()>,
}

impl PipelineHandle {
    /// Draining stage: stop the ticker, push one final snapshot bounded by
    /// `timeout`, close the transport. Resolves near the bound in the worst
    /// case (plus a small pickup grace when a tick push is mid-flight); an
    /// expired push is abandoned, not awaited.
    pub async fn drain(self, timeout: Duration) -> DrainOutcome {
        let (done_tx, done_rx) = oneshot::channel();
        let request = DrainRequest {
            timeout,
            done: done_tx,
        };
        if self.drain_tx.send(request).await.is_err() {
            warn!("export task already stopped before drain");
            let _ = self.task.await;
            return DrainOutcome::SendFailed;
        }
        // The final push bounds itself inside the task; the outer bound only
        // covers pickup when a tick push is still in flight.
        let bound = timeout.saturating_add(DRAIN_PICKUP_GRACE);
        match time::timeout(bound, done_rx).await {
            Ok(Ok(outcome)) => {
                let _ = self.task.await;
                outcome
            }
            Ok(Err(_)) => {
                warn!("export task went away mid-drain");
                let _ = self.task.await;
                DrainOutcome::SendFailed
            }
            Err(_) => {
                warn!("drain overran its bound with a push still in flight, abandoning export task");
                self.task.abort();
                DrainOutcome::TimedOut
            }
        }
    }
}

async fn run_loop<T: SnapshotTransport>(
    registry: Arc<MetricRegistry>,
    mut transport: T,
    period: Duration,
    mut drain_rx: mpsc::Receiver<DrainRequest>,
) {
    let mut ticker = time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // interval fires immediately once; consume that so the first export
    // lands one full period after start
    ticker.tick().await;

    let mut drained: Option<(oneshot::Sender<DrainOutcome>, DrainOutcome)> = None;
    loop {
        tokio::select! {
            request = drain_rx.recv() => {
                let Some(request) = request else {
                    debug!("pipeline handle dropped, stopping export task without final push");
                    break;
                };
                let outcome = final_push(&registry, &mut transport, request.timeout).await;
                drained = Some((request.done, outcome));
                break;
            }
            _ = ticker.tick() => {
                export_once(&registry, &mut transport).await;
            }
        }
    }
    transport.close().await;
    if let Some((done, outcome)) = drained {
        let _ = done.send(outcome);
    }
}

async fn export_once<T: SnapshotTransport>(registry: &MetricRegistry, transport: &mut T) {
    let snapshot = registry.snapshot();
    let series = snapshot.counters.len();
    let points = snapshot.total_points();
    match transport.send(&snapshot).await {
        Ok(()) => debug!(series, points, "snapshot exported"),
        // a failed push never kills the pipeline; the next tick starts clean
        Err(e) => warn!(error = %e, kind = e.kind(), "snapshot export failed"),
    }
}

async fn final_push<T: SnapshotTransport>(
    registry: &MetricRegistry,
    transport: &mut T,
    timeout: Duration,
) -> DrainOutcome {
    let snapshot = registry.snapshot();
    info!(
        timeout_ms = timeout.as_millis() as u64,
        points = snapshot.total_points(),
        "draining: pushing final snapshot"
    );
    match time::timeout(timeout, transport.send(&snapshot)).await {
        Ok(Ok(())) => {
            info!("final snapshot flushed");
            DrainOutcome::Flushed
        }
        Ok(Err(e)) => {
            warn!(error = %e, kind = e.kind(), "final snapshot push failed");
            DrainOutcome::SendFailed
        }
        Err(_) => {
            warn!("final snapshot push abandoned after timeout");
            DrainOutcome::TimedOut
        }
    }
}
