//! HTTP client for the remote task service.
//!
//! [`ApiClient`] is the single point of outbound traffic: it builds
//! requests against a configured base URL, attaches the bearer token when
//! the credential store holds one, and normalizes every failure into
//! [`ApiError`] at its boundary. Domain operations are thin stateless
//! wrappers over the request core — each fixes an endpoint, method, and
//! body shape and retains nothing between calls. No request is ever
//! retried.

pub mod client;

pub use client::ApiClient;

use std::time::Duration;

use crate::credentials::StorageError;

/// Default per-request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for the API client.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL that endpoint paths are appended to
    /// (e.g. `https://tasks.example.com/api`). A trailing slash is
    /// tolerated and ignored.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl ApiConfig {
    /// Creates a config for the given base URL with the default timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Errors surfaced by the API client.
///
/// Everything a request can fail with — transport trouble, a non-success
/// status, an undecodable body, an unreadable credential store — comes
/// out of this one type. The status code on [`ApiError::Api`] is retained
/// for callers that want to branch on it; the stores do not.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The server answered with a non-success status. The message is the
    /// server-supplied `message` body field when present, a generic
    /// fallback otherwise.
    #[error("{message}")]
    Api {
        /// HTTP status of the response.
        status: reqwest::StatusCode,
        /// Human-readable failure description.
        message: String,
    },

    /// The request could not be sent or the response not received.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body was not the JSON shape the client expected.
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// A request URL could not be built from the base URL and endpoint.
    #[error("invalid endpoint URL: {0}")]
    Url(#[from] url::ParseError),

    /// The stored credential could not be read while preparing the request.
    #[error(transparent)]
    Credentials(#[from] StorageError),
}
