mod lifecycle;

use crate::handle::ResourceHandle;

use std::sync::Arc;

/// Minimal handle for unit tests: fixed identity and connection state.
#[derive(Debug)]
pub(crate) struct FakeHandle {
    pub(crate) name: &'static str,
    pub(crate) connected: bool,
}

impl FakeHandle {
    pub(crate) fn connected(name: &'static str) -> Arc<Self> {
        Arc::new(Self {
            name,
            connected: true,
        })
    }

    pub(crate) fn disconnected(name: &'static str) -> Arc<Self> {
        Arc::new(Self {
            name,
            connected: false,
        })
    }
}

impl ResourceHandle for FakeHandle {
    type Identity = &'static str;

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn identity(&self) -> Self::Identity {
        self.name
    }
}
