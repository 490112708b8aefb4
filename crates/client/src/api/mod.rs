//! REST backend client.
//!
//! [`ApiClient::call`] is the single request path: JSON in, JSON out, an
//! optional bearer token, and every failure logged before it is returned.
//! The typed endpoint helpers in the submodules are thin wrappers over it.
//!
//! # Endpoints
//!
//! | Area | Module |
//! |------|--------|
//! | `/auth/*` | [`auth`] |
//! | `/products`, `/categories`, `/health` | [`catalog`] |
//! | `/cart` | [`cart`] |
//! | `/orders` | [`orders`] |

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod orders;

use std::sync::Arc;

use reqwest::Method;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::instrument;

use crate::auth::AuthState;
use crate::config::ClientConfig;

/// Message used when a failed response carries no `error` field.
pub const FALLBACK_ERROR_MESSAGE: &str = "An error occurred";

/// Errors that can occur when calling the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed before a response was received, or the body
    /// could not be read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status.
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// Response body was not the expected JSON.
    #[error("JSON decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// HTTP status for `Status` errors.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True for 401 responses (missing, expired or rejected token).
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401))
    }
}

/// Client for the shop's REST API.
///
/// Cheap to clone; clones share the HTTP connection pool.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: String,
    auth: AuthState,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a client for `config.api_base_url`. Bearer tokens are read
    /// from `auth` at request time.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &ClientConfig, auth: AuthState) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client: builder.build()?,
                base_url: config.api_base_url.as_str().trim_end_matches('/').to_string(),
                auth,
            }),
        })
    }

    /// Session the client reads its token from.
    #[must_use]
    pub fn auth(&self) -> &AuthState {
        &self.inner.auth
    }

    /// Base URL endpoints are appended to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Send one request and return the decoded JSON body.
    ///
    /// - `endpoint` is appended verbatim to the base URL (`"/cart"`).
    /// - With `requires_auth`, `Authorization: Bearer <token>` is attached
    ///   when a token is stored; without one the request goes out
    ///   unauthenticated and the backend decides.
    /// - `body` is only sent for `POST` and `PUT`.
    /// - The body is parsed as JSON whatever the status or content type.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Http` on transport failure, `ApiError::Decode` if
    /// the body is not JSON, and `ApiError::Status` (with the backend's
    /// `error` message, or [`FALLBACK_ERROR_MESSAGE`]) on a non-2xx status.
    /// Every error is logged before it is returned.
    #[instrument(skip(self, method, body), fields(method = %method))]
    pub async fn call<B>(
        &self,
        endpoint: &str,
        method: Method,
        body: Option<&B>,
        requires_auth: bool,
    ) -> Result<Value, ApiError>
    where
        B: Serialize + ?Sized + Sync,
    {
        let result = self.send(endpoint, method, body, requires_auth).await;
        if let Err(e) = &result {
            tracing::error!(error = %e, endpoint, "API error");
        }
        result
    }

    /// [`call`](Self::call) and decode the body into `T`.
    ///
    /// # Errors
    ///
    /// As [`call`](Self::call), plus `ApiError::Decode` if the JSON does
    /// not match `T`.
    pub async fn call_as<T, B>(
        &self,
        endpoint: &str,
        method: Method,
        body: Option<&B>,
        requires_auth: bool,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized + Sync,
    {
        let value = self.call(endpoint, method, body, requires_auth).await?;
        serde_json::from_value(value).map_err(|e| {
            tracing::error!(error = %e, endpoint, "Unexpected response shape");
            ApiError::Decode(e)
        })
    }

    /// `GET` with no body.
    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        requires_auth: bool,
    ) -> Result<T, ApiError> {
        self.call_as::<T, ()>(endpoint, Method::GET, None, requires_auth)
            .await
    }

    async fn send<B>(
        &self,
        endpoint: &str,
        method: Method,
        body: Option<&B>,
        requires_auth: bool,
    ) -> Result<Value, ApiError>
    where
        B: Serialize + ?Sized + Sync,
    {
        let url = format!("{}{endpoint}", self.inner.base_url);
        let sends_body = method == Method::POST || method == Method::PUT;

        let mut request = self.inner.client.request(method, &url);

        if requires_auth {
            match self.inner.auth.token() {
                Some(token) => request = request.bearer_auth(token.expose_secret()),
                None => tracing::debug!(endpoint, "No token stored; sending unauthenticated"),
            }
        }

        if sends_body && let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        let result: Value = serde_json::from_str(&text).map_err(|e| {
            tracing::debug!(
                status = %status,
                body = %text.chars().take(200).collect::<String>(),
                "Response body is not JSON"
            );
            ApiError::Decode(e)
        })?;

        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: error_message(&result),
            });
        }

        Ok(result)
    }
}

/// The backend's `{"error": "..."}` message, or the generic fallback.
fn error_message(body: &Value) -> String {
    body.get("error")
        .and_then(Value::as_str)
        .filter(|message| !message.is_empty())
        .map_or_else(|| FALLBACK_ERROR_MESSAGE.to_string(), str::to_string)
}
