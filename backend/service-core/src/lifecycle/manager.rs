use crate::config::{ActivationPolicy, ServiceConfig};
use crate::error::{ActivationError, BindError};
use crate::handle::ResourceHandle;
use crate::lifecycle::record::{BindAttempt, BindOutcome, LifecycleRecord};
use crate::lifecycle::{LifecycleSnapshot, Mode};

use std::fmt::{Debug, Formatter, Result as FormatResult};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{debug, info, warn};

/// Binds one shared handle to a service and tracks its client and server modes.
///
/// The handle is released (the lifecycle's reference dropped) as soon as a
/// deactivation leaves neither mode active. The handle itself is never closed.
///
/// # Thread Safety
///
/// This type is `Clone` and can be shared across threads. All clones share
/// the same record, and every operation runs as one critical section.
pub struct HandleLifecycle<H> {
    record: Arc<Mutex<LifecycleRecord<H>>>,
    policy: ActivationPolicy,
}

impl<H: ResourceHandle> HandleLifecycle<H> {
    /// Empty lifecycle with the permissive activation policy.
    pub fn new() -> Self {
        Self::with_policy(ActivationPolicy::default())
    }

    pub fn with_policy(policy: ActivationPolicy) -> Self {
        Self {
            record: Arc::new(Mutex::new(LifecycleRecord::new(None))),
            policy,
        }
    }

    /// Empty lifecycle taking its policy and advertised port from `config`.
    pub fn from_config(config: &ServiceConfig) -> Self {
        Self {
            record: Arc::new(Mutex::new(LifecycleRecord::new(
                config.advertised_port(),
            ))),
            policy: config.activation_policy,
        }
    }

    pub fn policy(&self) -> ActivationPolicy {
        self.policy
    }

    /// Bind `handle` as the shared handle.
    ///
    /// Rebinding a handle with the identity already held succeeds and keeps
    /// the new reference. Mode flags are not touched.
    ///
    /// # Errors
    ///
    /// - [`BindError::InvalidHandle`] if `handle` is `None` or not connected
    /// - [`BindError::AlreadyBound`] if a handle with another identity is held
    #[track_caller]
    pub fn bind(&self, handle: impl Into<Option<Arc<H>>>) -> Result<(), BindError> {
        // The guard is a temporary of this statement; `leftover` outlives it.
        let BindAttempt { result, leftover } = self.lock().bind(handle.into());

        match &result {
            Ok(BindOutcome::Bound(identity)) => info!("Bound handle {:?}", identity),
            Ok(BindOutcome::Rebound(identity)) => debug!("Rebound handle {:?}", identity),
            Err(e) => warn!("Bind rejected: {}", e),
        }

        drop(leftover);
        result.map(|_| ())
    }

    /// Currently bound handle, if any.
    pub fn current_handle(&self) -> Option<Arc<H>> {
        self.lock().handle()
    }

    /// Mark `mode` as depending on the handle. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`ActivationError::NotBound`] only under
    /// [`ActivationPolicy::RequireHandle`] when no handle is bound.
    #[track_caller]
    pub fn activate(&self, mode: Mode) -> Result<(), ActivationError> {
        let result = self.lock().activate(mode, self.policy);

        match &result {
            Ok(()) => debug!("{} mode active", mode),
            Err(e) => warn!("Activation rejected: {}", e),
        }

        result
    }

    #[track_caller]
    pub fn activate_client(&self) -> Result<(), ActivationError> {
        self.activate(Mode::Client)
    }

    #[track_caller]
    pub fn activate_server(&self) -> Result<(), ActivationError> {
        self.activate(Mode::Server)
    }

    /// Clear `mode`; release the handle if the other mode is inactive too.
    ///
    /// Safe to repeat: an inactive mode re-runs only the release check.
    pub fn deactivate(&self, mode: Mode) {
        // Same as bind: the handle is dropped after the guard.
        let released = self.lock().deactivate(mode);

        debug!("{} mode inactive", mode);

        if let Some(handle) = released {
            info!("No mode active, released handle {:?}", handle.identity());
        }
    }

    pub fn deactivate_client(&self) {
        self.deactivate(Mode::Client);
    }

    pub fn deactivate_server(&self) {
        self.deactivate(Mode::Server);
    }

    pub fn is_active(&self, mode: Mode) -> bool {
        self.lock().is_active(mode)
    }

    pub fn is_client_active(&self) -> bool {
        self.is_active(Mode::Client)
    }

    pub fn is_server_active(&self) -> bool {
        self.is_active(Mode::Server)
    }

    /// Advertised session port. Survives deactivation.
    pub fn port(&self) -> Option<u16> {
        self.lock().port()
    }

    pub fn set_port(&self, port: u16) {
        self.lock().set_port(port);
        debug!("Advertised port set to {}", port);
    }

    pub fn snapshot(&self) -> LifecycleSnapshot {
        self.lock().snapshot()
    }

    // Every transition leaves the record consistent, so a poisoned lock still
    // guards valid data.
    fn lock(&self) -> MutexGuard<'_, LifecycleRecord<H>> {
        self.record.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<H: ResourceHandle> Default for HandleLifecycle<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> Clone for HandleLifecycle<H> {
    fn clone(&self) -> Self {
        Self {
            record: Arc::clone(&self.record),
            policy: self.policy,
        }
    }
}

impl<H: ResourceHandle> Debug for HandleLifecycle<H> {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FormatResult {
        formatter
            .debug_struct("HandleLifecycle")
            .field("policy", &self.policy)
            .field("state", &self.snapshot())
            .finish()
    }
}
