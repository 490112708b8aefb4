//! `/auth` endpoints.
//!
//! These only talk to the backend; storing the returned session is the
//! caller's job (see [`AuthState::login`](crate::auth::AuthState::login)).

use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tracing::instrument;

use super::{ApiClient, ApiError};
use crate::models::{AuthResponse, SignupRequest, UserProfile};

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

impl ApiClient {
    /// Exchange credentials for a session.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` with 401 for bad credentials, or any
    /// transport/decode error.
    #[instrument(skip(self, password))]
    pub async fn login(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<AuthResponse, ApiError> {
        let body = LoginRequest {
            email,
            password: password.expose_secret(),
        };
        self.call_as("/auth/login", Method::POST, Some(&body), false)
            .await
    }

    /// Register a new account; the response already carries a session.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` with 409 when the email is taken, 400 for
    /// missing fields, or any transport/decode error.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn signup(&self, request: &SignupRequest) -> Result<AuthResponse, ApiError> {
        self.call_as("/auth/signup", Method::POST, Some(request), false)
            .await
    }

    /// Profile of the user the stored token belongs to.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` with 401 when not logged in.
    pub async fn me(&self) -> Result<UserProfile, ApiError> {
        self.get("/auth/me", true).await
    }
}
