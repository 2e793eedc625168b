//! Top-level facade crate for pulsegate.
//!
//! Re-exports core metric types and the agent library so users can depend on a single crate.

pub mod core {
    pub use pulsegate_core::*;
}

pub mod agent {
    pub use pulsegate_agent::*;
}
