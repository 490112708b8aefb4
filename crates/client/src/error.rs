//! Unified error type for front ends built on the client library.
//!
//! Each subsystem has its own error enum; `ClientError` gathers them so a
//! caller that drives several subsystems can use a single `?`.

use thiserror::Error;

use crate::api::ApiError;
use crate::config::ConfigError;
use crate::storage::StorageError;

/// Client-level error type.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Backend request failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Persistent storage could not be read or written.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// The operation needs a logged-in session.
    #[error("Not logged in")]
    NotLoggedIn,
}

/// Result type alias for `ClientError`.
pub type Result<T> = std::result::Result<T, ClientError>;
