//! Session-related types.
//!
//! Types returned by the auth endpoints and kept in storage for the
//! logged-in user.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use shopcart_core::UserId;

/// Profile of the logged-in user, as stored under the `user` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub full_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A logged-in session: bearer token plus profile.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone)]
pub struct Session {
    pub token: SecretString,
    pub user: UserProfile,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("token", &"[REDACTED]")
            .field("user", &self.user)
            .finish()
    }
}

/// Response of `POST /auth/login` and `POST /auth/signup`.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub token: String,
    pub user: UserProfile,
}

impl AuthResponse {
    /// Convert into a storable session.
    #[must_use]
    pub fn into_session(self) -> Session {
        Session {
            token: SecretString::from(self.token),
            user: self.user,
        }
    }
}

impl std::fmt::Debug for AuthResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthResponse")
            .field("message", &self.message)
            .field("token", &"[REDACTED]")
            .field("user", &self.user)
            .finish()
    }
}

/// Body of `POST /auth/signup`.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone, Serialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl std::fmt::Debug for SignupRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignupRequest")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("full_name", &self.full_name)
            .field("phone", &self.phone)
            .field("address", &self.address)
            .finish()
    }
}
