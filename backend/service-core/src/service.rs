//! Contract shared by services built on a [`HandleLifecycle`].

use crate::handle::ResourceHandle;
use crate::lifecycle::HandleLifecycle;

use std::fmt::{Display, Formatter, Result as FormatResult};

use serde::{Deserialize, Serialize};

/// A bus object a service registers, with the interfaces it implements.
///
/// Opaque data to this crate: paths and interface names are not validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusObjectDescription {
    pub path: String,
    pub interfaces: Vec<String>,
}

impl BusObjectDescription {
    pub fn new(path: impl Into<String>, interfaces: Vec<String>) -> Self {
        Self {
            path: path.into(),
            interfaces,
        }
    }
}

impl Display for BusObjectDescription {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FormatResult {
        write!(formatter, "{} [{}]", self.path, self.interfaces.join(", "))
    }
}

/// A service that runs in client mode, server mode, or both over one shared handle.
///
/// Implementors provide their lifecycle and the objects they register; the
/// running-state queries come for free.
pub trait ServiceCommon {
    type Handle: ResourceHandle;

    fn lifecycle(&self) -> &HandleLifecycle<Self::Handle>;

    /// Bus objects registered by this service.
    fn bus_object_descriptions(&self) -> Vec<BusObjectDescription>;

    fn is_client_running(&self) -> bool {
        self.lifecycle().is_client_active()
    }

    fn is_server_running(&self) -> bool {
        self.lifecycle().is_server_active()
    }
}
