//! In-process bus used when no real transport is attached.

use service_core::ResourceHandle;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::info;
use uuid::Uuid;

/// A bus attachment that is "connected" until told otherwise.
///
/// Each instance gets a fresh unique name, so two loopbacks never share an identity.
#[derive(Debug)]
pub struct LoopbackBus {
    unique_name: String,
    connected: AtomicBool,
}

impl LoopbackBus {
    /// Create and connect a new loopback bus.
    pub fn connect() -> Arc<Self> {
        let unique_name = format!(":loopback-{}.1", Uuid::new_v4().simple());
        info!("Loopback bus connected as {unique_name}");
        Arc::new(Self {
            unique_name,
            connected: AtomicBool::new(true),
        })
    }

    pub fn unique_name(&self) -> &str {
        &self.unique_name
    }

    pub fn disconnect(&self) {
        if self.connected.swap(false, Ordering::SeqCst) {
            info!("Loopback bus {} disconnected", self.unique_name);
        }
    }
}

impl ResourceHandle for LoopbackBus {
    type Identity = String;

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn identity(&self) -> Self::Identity {
        self.unique_name.clone()
    }
}
