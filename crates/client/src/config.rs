//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `SHOPCART_API_BASE_URL` - REST backend base URL (default: `http://localhost:5000/api`)
//! - `SHOPCART_STORAGE_PATH` - Path of the key/value store file
//!   (default: `<platform data dir>/shopcart/storage.json`)
//! - `SHOPCART_REQUEST_TIMEOUT_SECS` - Per-request timeout; unset means the
//!   transport default (no timeout)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Default REST backend base URL.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000/api";

/// File name of the store inside the data directory.
const STORAGE_FILE_NAME: &str = "storage.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL every endpoint path is appended to (e.g., `http://host/api`)
    pub api_base_url: Url,
    /// Location of the persistent key/value store
    pub storage_path: PathBuf,
    /// Optional per-request timeout
    pub request_timeout: Option<Duration>,
}

impl ClientConfig {
    /// Build a configuration from explicit values, without a timeout.
    #[must_use]
    pub fn new(api_base_url: Url, storage_path: impl Into<PathBuf>) -> Self {
        Self {
            api_base_url,
            storage_path: storage_path.into(),
            request_timeout: None,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid, or if no
    /// storage path is configured and the platform has no data directory.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_base_url = parse_base_url(
            "SHOPCART_API_BASE_URL",
            &get_env_or_default("SHOPCART_API_BASE_URL", DEFAULT_API_BASE_URL),
        )?;

        let storage_path = match get_optional_env("SHOPCART_STORAGE_PATH") {
            Some(path) => PathBuf::from(path),
            None => default_storage_path()?,
        };

        let request_timeout = get_optional_env("SHOPCART_REQUEST_TIMEOUT_SECS")
            .map(|value| parse_timeout("SHOPCART_REQUEST_TIMEOUT_SECS", &value))
            .transpose()?;

        Ok(Self {
            api_base_url,
            storage_path,
            request_timeout,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse and validate the API base URL. Only `http` and `https` are accepted.
fn parse_base_url(var_name: &str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidEnvVar(var_name.to_string(), e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }

    Ok(url)
}

/// Parse a whole number of seconds; zero is rejected.
fn parse_timeout(var_name: &str, value: &str) -> Result<Duration, ConfigError> {
    let secs = value
        .trim()
        .parse::<u64>()
        .map_err(|e| ConfigError::InvalidEnvVar(var_name.to_string(), e.to_string()))?;
    if secs == 0 {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            "must be greater than zero".to_string(),
        ));
    }
    Ok(Duration::from_secs(secs))
}

/// `<data dir>/shopcart/storage.json`.
fn default_storage_path() -> Result<PathBuf, ConfigError> {
    dirs::data_dir()
        .map(|dir| dir.join("shopcart").join(STORAGE_FILE_NAME))
        .ok_or_else(|| ConfigError::MissingEnvVar("SHOPCART_STORAGE_PATH".to_string()))
}
