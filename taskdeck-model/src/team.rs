//! Team records for the task service.
//!
//! Teams are read/append only from the client's perspective: creation and
//! membership additions are pass-through API calls, and the client keeps
//! no team state of its own.

use serde::{Deserialize, Serialize};

use crate::user::UserId;

/// Unique identifier for a team, assigned by the server.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamId(String);

impl TeamId {
    /// Wraps a server-assigned team identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the string representation of this team ID.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TeamId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A team record as returned by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    /// Server-assigned identifier.
    pub id: TeamId,
    /// Team display name.
    pub name: String,
    /// Member user ids, in server order.
    #[serde(default)]
    pub members: Vec<UserId>,
}

/// Body for `POST /teams`.
#[derive(Debug, Clone, Serialize)]
pub struct TeamDraft {
    /// Name of the new team.
    pub name: String,
}
