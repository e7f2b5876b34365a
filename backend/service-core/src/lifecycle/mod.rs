//! Shared-handle lifecycle management.
//!
//! One externally owned handle, two independent modes depending on it:
//!
//! - `bind` stores the handle (same identity may rebind, a different one is refused)
//! - `activate` marks a mode as depending on the handle
//! - `deactivate` clears a mode and drops the handle once neither mode is active
//!
//! # Architecture
//!
//! [`HandleLifecycle`] is a cheap `Clone` wrapper around a single
//! `Arc<Mutex<..>>` record. Every operation takes the lock once, runs the
//! whole check-mutate-release sequence, and returns. Nothing inside the lock
//! blocks, performs I/O, or calls back into caller code other than the two
//! [`ResourceHandle`](crate::handle::ResourceHandle) queries.

mod manager;
pub(crate) mod record;
mod snapshot;

pub use manager::HandleLifecycle;
pub use snapshot::LifecycleSnapshot;

use std::fmt::{Display, Formatter, Result as FormatResult};

/// Role in which a service depends on the bound handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Client,
    Server,
}

impl Mode {
    /// The other mode.
    pub fn other(self) -> Self {
        match self {
            Mode::Client => Mode::Server,
            Mode::Server => Mode::Client,
        }
    }
}

impl Display for Mode {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FormatResult {
        match self {
            Mode::Client => formatter.write_str("client"),
            Mode::Server => formatter.write_str("server"),
        }
    }
}
