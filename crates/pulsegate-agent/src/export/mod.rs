//! Export pipeline: periodic snapshot push with a bounded final drain.
//!
//! - `transport`: where completed snapshots get handed off (`SnapshotTransport`
//!   seam plus the TCP implementation used against a real collector).
//! - `pipeline`: the connect -> run -> drain lifecycle around a registry.

pub mod pipeline;
pub mod transport;

pub use pipeline::{DrainOutcome, ExportPipeline, PipelineHandle};
pub use transport::{SnapshotTransport, TcpTransport};
