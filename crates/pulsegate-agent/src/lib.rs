//! pulsegate agent library entry.
//!
//! This crate wires the config, export pipeline, collector transport, and the
//! instrumented demo HTTP app into a runnable telemetry agent. It is intended
//! to be consumed by the binary (`main.rs`) and by integration tests.

pub mod app_state;
pub mod config;
pub mod export;
pub mod handlers;
pub mod ops;
pub mod router;
pub mod shutdown;
