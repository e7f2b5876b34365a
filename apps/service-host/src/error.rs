use common::ErrorLocation;
use service_core::CoreError;

use std::panic::Location;

use serde::Serialize;
use thiserror::Error;

/// Errors surfaced by the host application.
///
/// Library errors are flattened to a message at the boundary so the whole
/// enum stays serializable for the run report.
#[derive(Debug, Error, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum HostError {
    /// Error from this app (logging, directories)
    #[error("Host Error: {message} {location}")]
    Host {
        message: String,
        location: ErrorLocation,
    },

    /// Config could not be loaded
    #[error("Config Error: {message} {location}")]
    Config {
        message: String,
        location: ErrorLocation,
    },

    /// A lifecycle transition was refused
    #[error("Lifecycle Error: {message} {location}")]
    Lifecycle {
        message: String,
        location: ErrorLocation,
    },
}

impl From<CoreError> for HostError {
    #[track_caller]
    fn from(error: CoreError) -> Self {
        let message = error.to_string();
        let location = ErrorLocation::from(Location::caller());
        match error {
            CoreError::Config(_) => HostError::Config { message, location },
            CoreError::Bind(_) | CoreError::Activation(_) => {
                HostError::Lifecycle { message, location }
            }
        }
    }
}
