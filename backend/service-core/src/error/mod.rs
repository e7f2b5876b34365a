pub mod activation;
pub mod bind;
pub mod config;

pub use activation::ActivationError;
pub use bind::BindError;
pub use config::ConfigError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Bind(#[from] BindError),

    #[error(transparent)]
    Activation(#[from] ActivationError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
