//! Authentication request and response bodies.

use serde::{Deserialize, Serialize};

use crate::user::User;

/// Body for `POST /auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    /// Login email address.
    pub email: String,
    /// Plain-text password; only ever sent over the wire, never stored.
    pub password: String,
}

/// Body for `POST /auth/register`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registration {
    /// Display name.
    pub name: String,
    /// Login email address.
    pub email: String,
    /// Plain-text password.
    pub password: String,
    /// Contact phone number.
    pub phone: String,
}

/// Successful login or registration response: the bearer token to persist
/// plus the authoritative user record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSuccess {
    /// Opaque bearer token for subsequent requests.
    pub token: String,
    /// The authenticated user.
    pub user: User,
}
