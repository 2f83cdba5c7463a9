//! Session lifecycle: who is logged in, and the token that proves it.
//!
//! [`SessionStore`] is the single source of truth for the authentication
//! state and the sole owner of the credential lifecycle — it saves the
//! token on login/registration and clears it on logout or when a stored
//! token is rejected during restoration. Consumers observe the
//! [`SessionState`] snapshot through a watch channel instead of blocking
//! on operations.

use std::sync::Arc;

use tokio::sync::watch;

use taskdeck_model::auth::{AuthSuccess, Credentials, Registration};
use taskdeck_model::user::User;

use crate::api::{ApiClient, ApiError};
use crate::credentials::{StorageError, TokenStore};

/// Errors surfaced by session operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The API call behind the operation failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The token could not be persisted.
    #[error("failed to persist credential: {0}")]
    Storage(#[from] StorageError),
}

/// Authentication state of the client. Exactly one variant holds at any
/// time.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// Boot state while session restoration has not yet completed.
    /// Never re-entered once restoration finishes.
    Loading,
    /// No session: no token stored, no user known.
    Unauthenticated,
    /// Logged in as the given user, with the token persisted.
    Authenticated(User),
    /// The last login or registration attempt failed.
    Error(String),
}

impl SessionState {
    /// Whether a user is currently logged in.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    /// The logged-in user, if any.
    #[must_use]
    pub const fn user(&self) -> Option<&User> {
        match self {
            Self::Authenticated(user) => Some(user),
            _ => None,
        }
    }
}

/// Observable store owning the authentication lifecycle.
///
/// Construction leaves the store in [`SessionState::Loading`]; callers
/// subscribe, then run [`SessionStore::restore`] once to resolve the
/// boot state. The token held in the credential store and the in-memory
/// state agree at every method return.
#[derive(Debug)]
pub struct SessionStore<S> {
    api: ApiClient<S>,
    credentials: Arc<S>,
    state: watch::Sender<SessionState>,
}

impl<S: TokenStore> SessionStore<S> {
    /// Creates a store in the [`SessionState::Loading`] boot state.
    ///
    /// `credentials` must be the same store the `api` client reads its
    /// bearer token from; the session store is the only writer.
    pub fn new(api: ApiClient<S>, credentials: Arc<S>) -> Self {
        let (state, _) = watch::channel(SessionState::Loading);
        Self {
            api,
            credentials,
            state,
        }
    }

    /// Returns the current state snapshot.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Subscribes to state transitions. The receiver always starts with
    /// the current snapshot.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// The logged-in user, if any.
    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        self.state.borrow().user().cloned()
    }

    /// Boot-time session restoration. Terminal for the boot sequence: it
    /// resolves `Loading` into `Authenticated` or `Unauthenticated` and
    /// never retries.
    ///
    /// A stored token the server rejects is expected on cold start (the
    /// session may simply have expired), so the token is cleared and the
    /// store resolves to `Unauthenticated` without surfacing an error.
    pub async fn restore(&self) {
        let token = match self.credentials.load().await {
            Ok(Some(token)) => token,
            Ok(None) => {
                self.set(SessionState::Unauthenticated);
                return;
            }
            Err(e) => {
                tracing::warn!(error = %e, "credential store unreadable; treating as logged out");
                self.set(SessionState::Unauthenticated);
                return;
            }
        };

        match self.api.current_user_with_token(&token).await {
            Ok(user) => {
                tracing::info!(user = %user.id, "session restored");
                self.set(SessionState::Authenticated(user));
            }
            Err(e) => {
                tracing::debug!(error = %e, "stored token rejected; clearing");
                if let Err(e) = self.credentials.clear().await {
                    tracing::warn!(error = %e, "failed to clear rejected token");
                }
                self.set(SessionState::Unauthenticated);
            }
        }
    }

    /// Logs in with email and password.
    ///
    /// On success the token is persisted before the state ever reads
    /// `Authenticated`. On failure the state becomes `Error` with the
    /// normalized message and no token is retained.
    ///
    /// # Errors
    ///
    /// Returns the API failure, or the storage failure if the returned
    /// token could not be persisted.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, SessionError> {
        let credentials = Credentials {
            email: email.to_string(),
            password: password.to_string(),
        };
        match self.api.login(&credentials).await {
            Ok(auth) => self.complete_auth(auth).await,
            Err(e) => {
                self.fail_auth(&e);
                Err(e.into())
            }
        }
    }

    /// Registers a new account and logs it in immediately; same contract
    /// as [`SessionStore::login`].
    ///
    /// # Errors
    ///
    /// Returns the API failure, or the storage failure if the returned
    /// token could not be persisted.
    pub async fn register(&self, registration: &Registration) -> Result<User, SessionError> {
        match self.api.register(registration).await {
            Ok(auth) => self.complete_auth(auth).await,
            Err(e) => {
                self.fail_auth(&e);
                Err(e.into())
            }
        }
    }

    /// Ends the session unconditionally.
    ///
    /// The in-memory session is torn down even when the credential store
    /// cannot be cleared; that failure is logged and swallowed, never
    /// propagated.
    pub async fn logout(&self) {
        if let Err(e) = self.credentials.clear().await {
            tracing::warn!(error = %e, "failed to clear stored token");
        }
        tracing::info!("session ended");
        self.set(SessionState::Unauthenticated);
    }

    /// Persists the token, then publishes `Authenticated`. Ordering is
    /// the store's core invariant: no observer may see `Authenticated`
    /// while the token is not durably stored.
    async fn complete_auth(&self, auth: AuthSuccess) -> Result<User, SessionError> {
        if let Err(e) = self.credentials.save(&auth.token).await {
            self.set(SessionState::Error(e.to_string()));
            return Err(e.into());
        }
        tracing::info!(user = %auth.user.id, "session established");
        self.set(SessionState::Authenticated(auth.user.clone()));
        Ok(auth.user)
    }

    /// Publishes `Error` for a failed login/registration attempt. An
    /// existing authenticated session survives a failed re-login; the
    /// failure still reaches the caller through the returned `Err`.
    fn fail_auth(&self, e: &ApiError) {
        if !self.state.borrow().is_authenticated() {
            self.set(SessionState::Error(e.to_string()));
        }
    }

    fn set(&self, next: SessionState) {
        self.state.send_replace(next);
    }
}
