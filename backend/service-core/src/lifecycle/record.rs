//! The unsynchronized lifecycle state machine.
//!
//! [`HandleLifecycle`](super::HandleLifecycle) owns one of these behind its
//! mutex. Kept separate so the transitions can be unit tested without locking.

use crate::config::ActivationPolicy;
use crate::error::{ActivationError, BindError};
use crate::handle::ResourceHandle;
use crate::lifecycle::{LifecycleSnapshot, Mode};

use common::ErrorLocation;

use std::sync::Arc;

/// What a successful bind did to the slot, with the identity now held.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum BindOutcome<I> {
    /// Slot was empty.
    Bound(I),
    /// Slot held a handle with the same identity; it was replaced by the new reference.
    Rebound(I),
}

/// Result of a bind plus whichever reference the record let go of.
///
/// `leftover` is the displaced handle on rebind or the offered one on
/// rejection. The caller drops it once the lock is released.
pub(crate) struct BindAttempt<H: ResourceHandle> {
    pub(crate) result: Result<BindOutcome<H::Identity>, BindError>,
    pub(crate) leftover: Option<Arc<H>>,
}

impl<H: ResourceHandle> BindAttempt<H> {
    fn rejected(error: BindError, offered: Option<Arc<H>>) -> Self {
        Self {
            result: Err(error),
            leftover: offered,
        }
    }
}

pub(crate) struct LifecycleRecord<H> {
    handle: Option<Arc<H>>,
    client_active: bool,
    server_active: bool,
    port: Option<u16>,
}

impl<H: ResourceHandle> LifecycleRecord<H> {
    pub(crate) fn new(port: Option<u16>) -> Self {
        Self {
            handle: None,
            client_active: false,
            server_active: false,
            port,
        }
    }

    /// Store `handle` unless it is unusable or a different resource is held.
    ///
    /// On error nothing is modified.
    #[track_caller]
    pub(crate) fn bind(&mut self, handle: Option<Arc<H>>) -> BindAttempt<H> {
        let Some(handle) = handle else {
            return BindAttempt::rejected(
                BindError::InvalidHandle {
                    message: String::from("handle can't be absent"),
                    location: ErrorLocation::caller(),
                },
                None,
            );
        };

        let offered = handle.identity();

        if !handle.is_connected() {
            return BindAttempt::rejected(
                BindError::InvalidHandle {
                    message: format!("handle {offered:?} is not connected"),
                    location: ErrorLocation::caller(),
                },
                Some(handle),
            );
        }

        if let Some(existing) = &self.handle {
            let held = existing.identity();
            if held != offered {
                return BindAttempt::rejected(
                    BindError::AlreadyBound {
                        message: format!("bound to {held:?}, refusing {offered:?}"),
                        location: ErrorLocation::caller(),
                    },
                    Some(handle),
                );
            }
        }

        let displaced = self.handle.replace(handle);
        let result = match displaced {
            None => BindOutcome::Bound(offered),
            Some(_) => BindOutcome::Rebound(offered),
        };

        BindAttempt {
            result: Ok(result),
            leftover: displaced,
        }
    }

    pub(crate) fn handle(&self) -> Option<Arc<H>> {
        self.handle.clone()
    }

    pub(crate) fn is_active(&self, mode: Mode) -> bool {
        match mode {
            Mode::Client => self.client_active,
            Mode::Server => self.server_active,
        }
    }

    fn flag_mut(&mut self, mode: Mode) -> &mut bool {
        match mode {
            Mode::Client => &mut self.client_active,
            Mode::Server => &mut self.server_active,
        }
    }

    #[track_caller]
    pub(crate) fn activate(
        &mut self,
        mode: Mode,
        policy: ActivationPolicy,
    ) -> Result<(), ActivationError> {
        if policy == ActivationPolicy::RequireHandle && self.handle.is_none() {
            return Err(ActivationError::NotBound {
                message: format!("{mode} mode needs a bound handle"),
                location: ErrorLocation::caller(),
            });
        }

        *self.flag_mut(mode) = true;
        Ok(())
    }

    /// Clear `mode`. Returns the handle if this left no mode active.
    ///
    /// The caller drops the returned handle, ideally after releasing the lock.
    pub(crate) fn deactivate(&mut self, mode: Mode) -> Option<Arc<H>> {
        *self.flag_mut(mode) = false;

        if self.is_active(mode.other()) {
            return None;
        }

        self.handle.take()
    }

    pub(crate) fn port(&self) -> Option<u16> {
        self.port
    }

    pub(crate) fn set_port(&mut self, port: u16) {
        self.port = Some(port);
    }

    pub(crate) fn snapshot(&self) -> LifecycleSnapshot {
        LifecycleSnapshot {
            bound: self.handle.is_some(),
            client_active: self.client_active,
            server_active: self.server_active,
            port: self.port,
        }
    }
}
