//! Primitives shared by every crate in the workspace.
//!
//! ## Architecture
//!
//! - **common** (this crate): error plumbing with no domain knowledge
//! - **service-core**: the bus-handle lifecycle and service contract
//! - **service-host**: application wiring a service onto a loopback bus
//!
//! Keeping location capture here lets every error enum report where it was
//! raised without depending on the crate that raised it.

pub mod error;

pub use error::error_location::ErrorLocation;

#[cfg(test)]
mod tests;
