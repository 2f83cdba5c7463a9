//! User records as served by the task service.

use serde::{Deserialize, Serialize};

/// Unique identifier for a user, assigned by the server.
///
/// Opaque to the client: never parsed, never minted locally.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Wraps a server-assigned user identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the string representation of this user ID.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A user record as returned by the server.
///
/// The server's copy is authoritative. The client never edits a user
/// locally; it only replaces the whole record after a server round trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Server-assigned identifier.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Login email address.
    pub email: String,
    /// Contact phone number.
    pub phone: String,
    /// Role label (e.g. "admin", "member"); semantics are server-defined.
    pub role: String,
}
