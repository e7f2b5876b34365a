//! A dual-mode service hosted on a loopback bus.
//!
//! The host starts the service as a server and as a client over the same bus,
//! stops both, and reports what the lifecycle looked like at each point.

use crate::error::HostError;
use crate::loopback::LoopbackBus;

use common::ErrorLocation;
use service_core::{
    BusObjectDescription, CoreError, HandleLifecycle, LifecycleSnapshot, ServiceCommon,
    ServiceConfig,
};

use std::panic::Location;
use std::path::Path;
use std::sync::Arc;

use log::{error, info};
use serde::Serialize;

pub const SERVICE_OBJECT_PATH: &str = "/Service";
pub const SERVICE_INTERFACE: &str = "org.example.Service";

pub struct HostedService {
    lifecycle: HandleLifecycle<LoopbackBus>,
}

impl HostedService {
    pub fn new(config: &ServiceConfig) -> Self {
        Self {
            lifecycle: HandleLifecycle::from_config(config),
        }
    }

    /// Bind `bus` and start client mode.
    pub fn start_client(&self, bus: Arc<LoopbackBus>) -> Result<(), CoreError> {
        self.lifecycle.bind(bus)?;
        self.lifecycle.activate_client()?;
        info!("Client mode started");
        Ok(())
    }

    /// Bind `bus` and start server mode.
    pub fn start_server(&self, bus: Arc<LoopbackBus>) -> Result<(), CoreError> {
        self.lifecycle.bind(bus)?;
        self.lifecycle.activate_server()?;
        match self.lifecycle.port() {
            Some(port) => info!("Server mode started on port {port}"),
            None => info!("Server mode started without an advertised port"),
        }
        Ok(())
    }

    pub fn stop_client(&self) {
        self.lifecycle.deactivate_client();
        info!("Client mode stopped");
    }

    pub fn stop_server(&self) {
        self.lifecycle.deactivate_server();
        info!("Server mode stopped");
    }
}

impl ServiceCommon for HostedService {
    type Handle = LoopbackBus;

    fn lifecycle(&self) -> &HandleLifecycle<LoopbackBus> {
        &self.lifecycle
    }

    fn bus_object_descriptions(&self) -> Vec<BusObjectDescription> {
        vec![BusObjectDescription::new(
            SERVICE_OBJECT_PATH,
            vec![SERVICE_INTERFACE.to_string()],
        )]
    }
}

/// What the host observed during one run.
#[derive(Debug, Serialize)]
pub struct RunReport {
    pub bus: String,
    pub objects: Vec<BusObjectDescription>,
    pub running: LifecycleSnapshot,
    pub stopped: LifecycleSnapshot,
}

/// Read the service config from `config_dir`.
///
/// # Errors
///
/// Returns [`HostError::Config`] if the file is present but unusable.
#[track_caller]
pub fn load_config(config_dir: &Path) -> Result<ServiceConfig, HostError> {
    Ok(ServiceConfig::load(config_dir).map_err(CoreError::from)?)
}

/// Run the service through one start/stop cycle on a fresh loopback bus.
///
/// # Errors
///
/// Returns [`HostError::Lifecycle`] if a transition is refused or the bus is
/// still held after both modes stopped.
pub fn run(config: &ServiceConfig) -> Result<RunReport, HostError> {
    let service = HostedService::new(config);
    let bus = LoopbackBus::connect();

    service.start_server(Arc::clone(&bus))?;
    service.start_client(Arc::clone(&bus))?;

    let running = service.lifecycle().snapshot();
    for object in service.bus_object_descriptions() {
        info!("Registered {object}");
    }

    service.stop_client();
    service.stop_server();

    let stopped = service.lifecycle().snapshot();
    if stopped.bound {
        error!("Bus {} still bound after both modes stopped", bus.unique_name());
        return Err(HostError::Lifecycle {
            message: format!("bus {} still bound after stop", bus.unique_name()),
            location: ErrorLocation::from(Location::caller()),
        });
    }

    bus.disconnect();

    Ok(RunReport {
        bus: bus.unique_name().to_string(),
        objects: service.bus_object_descriptions(),
        running,
        stopped,
    })
}
