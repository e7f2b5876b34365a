//! Bus-handle lifecycle for services that run in client mode, server mode, or both.
//!
//! A service binds one externally owned bus handle, marks the modes that
//! depend on it, and lets go of the handle when the last mode stops. See
//! [`lifecycle::HandleLifecycle`] for the state machine and
//! [`service::ServiceCommon`] for the contract higher-level services implement.

pub mod config;
pub mod error;
pub mod handle;
pub mod lifecycle;
pub mod service;

#[cfg(test)]
mod tests;

pub use config::{ActivationPolicy, ServiceConfig};
pub use error::{ActivationError, BindError, ConfigError, CoreError};
pub use handle::ResourceHandle;
pub use lifecycle::{HandleLifecycle, LifecycleSnapshot, Mode};
pub use service::{BusObjectDescription, ServiceCommon};
