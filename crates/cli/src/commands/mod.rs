//! Command implementations, one module per command group.

pub mod account;
pub mod cart;
pub mod catalog;
pub mod orders;

use shopcart_client::{ApiError, ClientError, ConfigError, StorageError};
use thiserror::Error;

/// Errors a command can fail with.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Client(#[from] ClientError),

    /// The password could not be read from stdin.
    #[error("Failed to read password: {0}")]
    PasswordInput(#[source] std::io::Error),

    #[error("Password must not be empty")]
    EmptyPassword,

    /// Checkout without `--address` and no address on the profile.
    #[error("No shipping address given and none on the profile")]
    MissingAddress,
}

impl From<ApiError> for CommandError {
    fn from(err: ApiError) -> Self {
        Self::Client(err.into())
    }
}

impl From<StorageError> for CommandError {
    fn from(err: StorageError) -> Self {
        Self::Client(err.into())
    }
}

impl From<ConfigError> for CommandError {
    fn from(err: ConfigError) -> Self {
        Self::Client(err.into())
    }
}
