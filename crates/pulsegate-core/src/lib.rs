//! pulsegate core: labeled counters, snapshots, and the shared error surface.
//!
//! This crate defines the in-process metric registry shared by the agent,
//! instrumented request handlers, and the export pipeline. It intentionally
//! carries no transport or runtime dependencies so it can be reused in
//! multiple contexts.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths must surface as `Error`/`Result` so production
//! processes do not crash on bad measurements or concurrent registration.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod counter;
pub mod error;
pub mod label;
pub mod registry;
pub mod resource;
pub mod snapshot;

/// Shared result type.
pub use error::{Error, Result};
