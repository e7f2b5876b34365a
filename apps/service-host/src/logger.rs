//! Log output for the service host.
//!
//! Records go to colored stdout and to `service-host.log`. The lifecycle's
//! records (target `service_core`) get their own level from
//! [`ServiceConfig::lifecycle_log_level`](service_core::ServiceConfig), so
//! bind/release tracing can be turned up without flooding the host's output.

use crate::error::HostError;

use common::ErrorLocation;

use std::io::stdout;
use std::path::Path;
use std::sync::{Mutex, PoisonError};
use std::time::SystemTime;

use fern::Dispatch;
use fern::colors::Color::{Blue, Green, Magenta, Red, Yellow};
use fern::colors::ColoredLevelConfig;
use humantime::format_rfc3339_seconds;
use log::{LevelFilter, info, warn};

pub const LOG_FILE_NAME: &str = "service-host.log";

/// Target of every record emitted by the lifecycle library.
pub const LIFECYCLE_TARGET: &str = "service_core";

#[cfg(debug_assertions)]
const HOST_LOG_LEVEL: LevelFilter = LevelFilter::Debug;

#[cfg(not(debug_assertions))]
const HOST_LOG_LEVEL: LevelFilter = LevelFilter::Info;

/// Set once a dispatcher is actually installed. A failed attempt leaves it
/// clear so the next call can retry.
static INSTALLED: Mutex<bool> = Mutex::new(false);

/// Install the global logger.
///
/// Later calls after a successful one only log a warning and return Ok.
///
/// # Errors
///
/// Returns [`HostError::Host`] if the log file cannot be created or another
/// logger is already installed. Nothing is installed in that case.
#[track_caller]
pub fn initialize(log_dir: &Path, lifecycle_level: LevelFilter) -> Result<(), HostError> {
    let location = ErrorLocation::caller();
    let mut installed = INSTALLED.lock().unwrap_or_else(PoisonError::into_inner);
    if *installed {
        warn!("Logger already initialized");
        return Ok(());
    }

    dispatch(log_dir, lifecycle_level)?
        .apply()
        .map_err(|e| HostError::Host {
            message: format!("Failed to install logger: {e}"),
            location,
        })?;
    *installed = true;

    info!("Logging to {} (lifecycle level {lifecycle_level})", log_dir.display());
    Ok(())
}

/// Build the dispatcher without installing it.
#[track_caller]
pub(crate) fn dispatch(log_dir: &Path, lifecycle_level: LevelFilter) -> Result<Dispatch, HostError> {
    let location = ErrorLocation::caller();
    let log_file = fern::log_file(log_dir.join(LOG_FILE_NAME)).map_err(|e| HostError::Host {
        message: format!("Failed to create log file in {}: {e}", log_dir.display()),
        location,
    })?;

    let colors = ColoredLevelConfig::new()
        .debug(Blue)
        .info(Green)
        .warn(Yellow)
        .error(Red)
        .trace(Magenta);

    let console = Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "{} {:5} {}: {}",
                format_rfc3339_seconds(SystemTime::now()),
                colors.color(record.level()),
                record.target(),
                message
            ))
        })
        .chain(stdout());

    let file = Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} {:5} {}: {}",
                format_rfc3339_seconds(SystemTime::now()),
                record.level(),
                record.target(),
                message
            ))
        })
        .chain(log_file);

    Ok(Dispatch::new()
        .level(HOST_LOG_LEVEL)
        .level_for(LIFECYCLE_TARGET, lifecycle_level)
        .chain(console)
        .chain(file))
}
