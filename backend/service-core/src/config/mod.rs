//! Per-service settings read from `service.json`.
//!
//! Every key is optional; an absent file means all defaults. Unknown keys are
//! rejected so a misspelled policy cannot silently fall back to permissive.

use crate::error::config::ConfigError;

use common::ErrorLocation;

use std::io::ErrorKind;
use std::path::Path;

use log::{LevelFilter, debug, info};
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE_NAME: &str = "service.json";
const CONFIG_VERSION: u32 = 1;

/// Whether a mode may be activated before any handle is bound.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum ActivationPolicy {
    /// Activation never fails; a handle can be bound before or after.
    #[default]
    Permissive,
    /// Activation fails with `NotBound` while the handle slot is empty.
    RequireHandle,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    #[serde(default = "default_version")]
    pub version: u32,

    /// Session port advertised by the service. `0` leaves it unassigned.
    #[serde(default)]
    pub port: u16,

    #[serde(default)]
    pub activation_policy: ActivationPolicy,

    /// Verbosity of bind/activate/release records (the `service_core` log target).
    #[serde(default = "default_lifecycle_log_level")]
    pub lifecycle_log_level: LevelFilter,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            port: 0,
            activation_policy: ActivationPolicy::default(),
            lifecycle_log_level: default_lifecycle_log_level(),
        }
    }
}

fn default_version() -> u32 {
    CONFIG_VERSION
}

fn default_lifecycle_log_level() -> LevelFilter {
    LevelFilter::Info
}

impl ServiceConfig {
    /// Advertised port, or `None` when unassigned.
    pub fn advertised_port(&self) -> Option<u16> {
        (self.port != 0).then_some(self.port)
    }

    /// Read `{config_dir}/service.json`, or the defaults if there is none.
    ///
    /// Errors carry the location of the code that asked for the config.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::Read`] if the file exists but cannot be read
    /// - [`ConfigError::Parse`] if it is not a valid config document
    /// - [`ConfigError::Invalid`] if it parses but fails [`validate`](Self::validate)
    #[track_caller]
    pub fn load(config_dir: &Path) -> Result<Self, ConfigError> {
        let location = ErrorLocation::caller();
        let path = config_dir.join(CONFIG_FILE_NAME);

        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("No {} in {}, using defaults", CONFIG_FILE_NAME, config_dir.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path,
                    source,
                    location,
                });
            }
        };

        let config: Self = match serde_json::from_str(&contents) {
            Ok(config) => config,
            Err(e) => {
                return Err(ConfigError::Parse {
                    path,
                    reason: e.to_string(),
                    location,
                });
            }
        };

        config.validate_at(location)?;

        debug!("Loaded {}: {:?}", path.display(), config);
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for a version this build does not know.
    #[track_caller]
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_at(ErrorLocation::caller())
    }

    fn validate_at(&self, location: ErrorLocation) -> Result<(), ConfigError> {
        if self.version == 0 || self.version > CONFIG_VERSION {
            return Err(ConfigError::Invalid {
                reason: format!(
                    "unsupported version {} (expected 1-{})",
                    self.version, CONFIG_VERSION
                ),
                location,
            });
        }

        Ok(())
    }
}
