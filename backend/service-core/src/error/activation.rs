use common::ErrorLocation;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum ActivationError {
    /// Raised only under [`ActivationPolicy::RequireHandle`](crate::config::ActivationPolicy::RequireHandle).
    #[error("Not Bound Error: {message} {location}")]
    NotBound {
        message: String,
        location: ErrorLocation,
    },
}
