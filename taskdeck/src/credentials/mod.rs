//! Persistent credential storage for the session token.
//!
//! Exactly one opaque bearer token lives under one location; its absence
//! means logged out. The [`crate::session::SessionStore`] owns the
//! credential lifecycle (save on login, clear on logout), while the API
//! client only ever reads the current token when attaching auth headers.

use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;

/// Errors that can occur while reading or writing the stored token.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// An underlying I/O error occurred.
    #[error("credential storage I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Async persistent store for the session's bearer token.
///
/// Implementations survive process restarts (or deliberately don't, for
/// the in-memory variant). Reads and writes are suspension points; no
/// method blocks the caller.
pub trait TokenStore: Send + Sync {
    /// Returns the stored token, or `None` when logged out.
    fn load(&self) -> impl Future<Output = Result<Option<String>, StorageError>> + Send;

    /// Persists a token, replacing any previous one.
    fn save(&self, token: &str) -> impl Future<Output = Result<(), StorageError>> + Send;

    /// Removes the stored token. Clearing an empty store is not an error.
    fn clear(&self) -> impl Future<Output = Result<(), StorageError>> + Send;
}

/// File-backed token store.
///
/// The token is the file's entire contents (surrounding whitespace
/// ignored). A missing file means no session. On unix the file is written
/// with `0600` permissions so the token is not world-readable.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Creates a store backed by the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    async fn load(&self) -> Result<Option<String>, StorageError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => {
                let token = contents.trim();
                if token.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(token.to_string()))
                }
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, token: &str) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.path, token).await?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tokio::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600)).await?;
        }
        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory token store.
///
/// Holds the token for the lifetime of the process only. Used by tests
/// and by embedders that manage persistence themselves.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-loaded with a token, as if a prior session
    /// had saved one.
    #[must_use]
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    async fn load(&self) -> Result<Option<String>, StorageError> {
        Ok(self.token.read().clone())
    }

    async fn save(&self, token: &str) -> Result<(), StorageError> {
        *self.token.write() = Some(token.to_string());
        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        *self.token.write() = None;
        Ok(())
    }
}
