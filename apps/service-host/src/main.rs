use service_host::error::HostError;
use service_host::host::{load_config, run};
use service_host::logger::initialize as LoggerInitialize;

use common::ErrorLocation;

use std::env;
use std::fs::create_dir_all;
use std::panic::Location;
use std::path::PathBuf;

use log::info;

const APP_DIR_NAME: &str = "service-host";

/// Overrides the config directory (otherwise `<config_dir>/service-host`).
const CONFIG_DIR_ENV: &str = "SERVICE_HOST_CONFIG_DIR";

fn main() -> Result<(), HostError> {
    let config_dir = env::var_os(CONFIG_DIR_ENV)
        .map(PathBuf::from)
        .or_else(|| dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME)))
        .ok_or_else(|| HostError::Host {
            message: format!("No config directory; set {CONFIG_DIR_ENV}"),
            location: ErrorLocation::from(Location::caller()),
        })?;

    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(env::temp_dir)
        .join(APP_DIR_NAME)
        .join("logs");

    create_dir_all(&log_dir).map_err(|e| HostError::Host {
        message: format!("Failed to create log directory: {e}"),
        location: ErrorLocation::from(Location::caller()),
    })?;

    // Config first: it decides how verbose the lifecycle is in the log
    let config = load_config(&config_dir)?;
    LoggerInitialize(&log_dir, config.lifecycle_log_level)?;

    info!("Service host starting with config from {}", config_dir.display());

    let report = run(&config)?;

    let json = serde_json::to_string_pretty(&report).map_err(|e| HostError::Host {
        message: format!("Failed to serialize run report: {e}"),
        location: ErrorLocation::from(Location::caller()),
    })?;
    println!("{json}");

    info!("Service host finished");
    Ok(())
}
