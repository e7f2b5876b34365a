use std::path::PathBuf;

use common::ErrorLocation;
use thiserror::Error;

/// Why a `service.json` could not become a [`ServiceConfig`](crate::config::ServiceConfig).
///
/// A missing file is not an error; the defaults apply.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config Read Error: {path}: {source} {location}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
        location: ErrorLocation,
    },

    /// Malformed JSON, a wrong type, or an unknown key.
    #[error("Config Parse Error: {path}: {reason} {location}")]
    Parse {
        path: PathBuf,
        reason: String,
        location: ErrorLocation,
    },

    #[error("Config Invalid Error: {reason} {location}")]
    Invalid {
        reason: String,
        location: ErrorLocation,
    },
}
