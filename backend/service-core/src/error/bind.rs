use common::ErrorLocation;

use thiserror::Error as ThisError;

/// Rejections from [`HandleLifecycle::bind`](crate::lifecycle::HandleLifecycle::bind).
///
/// Both are caller errors. The lifecycle state is left exactly as it was.
#[derive(Debug, ThisError)]
pub enum BindError {
    /// Handle missing or not connected to its transport.
    #[error("Invalid Handle Error: {message} {location}")]
    InvalidHandle {
        message: String,
        location: ErrorLocation,
    },

    /// A handle with a different identity is already bound.
    #[error("Already Bound Error: {message} {location}")]
    AlreadyBound {
        message: String,
        location: ErrorLocation,
    },
}
