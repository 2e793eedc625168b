//! Shared error type across pulsegate crates.

use thiserror::Error;

/// Shared result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type used by core and agent.
#[derive(Debug, Error)]
pub enum Error {
    /// Counter deltas must be finite and non-negative.
    #[error("invalid counter delta {delta}: must be finite and >= 0")]
    InvalidDelta { delta: f64 },
    #[error("config error: {0}")]
    Config(String),
    #[error("connect to collector {endpoint} failed: {source}")]
    Connect {
        endpoint: String,
        #[source]
        source: std::io::Error,
    },
    #[error("transport: {0}")]
    Transport(#[from] std::io::Error),
    #[error("snapshot encode failed: {0}")]
    Encode(String),
}

impl Error {
    /// Stable machine-readable kind, used in structured log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::InvalidDelta { .. } => "INVALID_DELTA",
            Error::Config(_) => "CONFIG",
            Error::Connect { .. } => "CONNECT",
            Error::Transport(_) => "TRANSPORT",
            Error::Encode(_) => "ENCODE",
        }
    }
}
