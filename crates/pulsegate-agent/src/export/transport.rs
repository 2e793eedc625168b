//! Snapshot transports.
//!
//! The pipeline hands every captured snapshot to a `SnapshotTransport`. The
//! bundled `TcpTransport` writes one newline-terminated JSON document per
//! snapshot to the collector socket; a failed write drops the connection and
//! the next send dials afresh (one attempt per push, no backoff).

use std::io;
use std::time::Duration;

use async_trait::async_trait;
use bytes::{BufMut, BytesMut};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tracing::debug;

use pulsegate_core::error::{Error, Result};
use pulsegate_core::snapshot::Snapshot;

/// Destination for completed snapshots.
#[async_trait]
pub trait SnapshotTransport: Send {
    /// Deliver one snapshot. An error marks this push as failed; the caller
    /// decides whether to retry (the pipeline does not, ticks are independent).
    async fn send(&mut self, snapshot: &Snapshot) -> Result<()>;

    /// Release the underlying connection, if any.
    async fn close(&mut self);
}

/// TCP transport speaking newline-delimited JSON.
pub struct TcpTransport {
    endpoint: String,
    connect_timeout: Duration,
    stream: Option<TcpStream>,
}

impl TcpTransport {
    /// Dial the collector, bounded by `connect_timeout`.
    pub async fn connect(endpoint: &str, connect_timeout: Duration) -> Result<Self> {
        let stream = dial(endpoint, connect_timeout).await?;
        debug!(endpoint, "collector connection established");
        Ok(Self {
            endpoint: endpoint.to_string(),
            connect_timeout,
            stream: Some(stream),
        })
    }

    /// Endpoint this transport pushes to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl SnapshotTransport for TcpTransport {
    async fn send(&mut self, snapshot: &Snapshot) -> Result<()> {
        let frame = encode_frame(snapshot)?;
        if self.stream.is_none() {
            // previous push failed: one fresh dial per attempt
            let stream = dial(&self.endpoint, self.connect_timeout).await?;
            debug!(endpoint = %self.endpoint, "collector connection re-established");
            self.stream = Some(stream);
        }
        let Some(stream) = self.stream.as_mut() else {
            return Err(Error::Transport(io::Error::new(
                io::ErrorKind::NotConnected,
                "collector stream missing",
            )));
        };
        if let Err(e) = write_frame(stream, &frame).await {
            self.stream = None;
            return Err(Error::Transport(e));
        }
        Ok(())
    }

    async fn close(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            let _ = stream.shutdown().await;
        }
    }
}

/// One snapshot = one newline-terminated JSON document.
fn encode_frame(snapshot: &Snapshot) -> Result<BytesMut> {
    let mut buf = BytesMut::with_capacity(1024);
    serde_json::to_writer((&mut buf).writer(), snapshot)
        .map_err(|e| Error::Encode(e.to_string()))?;
    buf.put_u8(b'\n');
    Ok(buf)
}

async fn write_frame(stream: &mut TcpStream, frame: &[u8]) -> io::Result<()> {
    stream.write_all(frame).await?;
    stream.flush().await
}

async fn dial(endpoint: &str, timeout: Duration) -> Result<TcpStream> {
    match tokio::time::timeout(timeout, TcpStream::connect(endpoint)).await {
        Ok(Ok(stream)) => Ok(stream),
        Ok(Err(e)) => Err(Error::Connect {
            endpoint: endpoint.to_string(),
            source: e,
        }),
        Err(_) => Err(Error::Connect {
            endpoint: endpoint.to_string(),
            source: io::Error::new(io::ErrorKind::TimedOut, "connect timed out"),
        }),
    }
}
