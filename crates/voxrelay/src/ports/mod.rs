//! Ports (Interfaces)
//!
//! Abstract interfaces that define how the driver talks to a relay.
//!
//! Implementations of these traits live in the client crates.

mod relay;

// Re-exports
pub use relay::*;
