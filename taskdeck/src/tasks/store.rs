//! Observable store over the cached task collection.

use tokio::sync::watch;

use taskdeck_model::task::{Task, TaskDraft, TaskId, TaskPatch};
use taskdeck_model::user::UserId;

use super::{StatusFilter, TaskListState, reconcile};
use crate::api::{ApiClient, ApiError};
use crate::credentials::TokenStore;

/// Task cache for the active session.
///
/// Holds no credentials of its own: every operation goes through the API
/// client, which reads the bearer token from the credential store. All
/// mutations trust the server's response over the local copy — records
/// are replaced wholesale, never field-merged.
#[derive(Debug)]
pub struct TaskStore<S> {
    api: ApiClient<S>,
    state: watch::Sender<TaskListState>,
}

impl<S: TokenStore> TaskStore<S> {
    /// Creates an empty store.
    pub fn new(api: ApiClient<S>) -> Self {
        let (state, _) = watch::channel(TaskListState::default());
        Self { api, state }
    }

    /// Returns the current collection snapshot.
    #[must_use]
    pub fn snapshot(&self) -> TaskListState {
        self.state.borrow().clone()
    }

    /// Subscribes to collection changes. The receiver always starts with
    /// the current snapshot.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<TaskListState> {
        self.state.subscribe()
    }

    /// Replaces the cache wholesale with the server's list for the given
    /// filters (a full refresh, not a merge). Filter pairs pass through
    /// to the query string unvalidated.
    ///
    /// The loading flag is set for the duration of the call and cleared
    /// on both outcomes.
    ///
    /// # Errors
    ///
    /// Returns the API failure; the same message lands in the snapshot's
    /// `error` field and the cached items stay untouched.
    pub async fn fetch_all(&self, filters: &[(String, String)]) -> Result<(), ApiError> {
        self.state.send_modify(|s| {
            s.loading = true;
            s.error = None;
        });
        match self.api.list_tasks(filters).await {
            Ok(items) => {
                self.state.send_modify(|s| {
                    s.items = reconcile::dedup_by_id(items);
                    s.loading = false;
                });
                Ok(())
            }
            Err(e) => {
                self.state.send_modify(|s| {
                    s.error = Some(e.to_string());
                    s.loading = false;
                });
                Err(e)
            }
        }
    }

    /// Creates a task and prepends the server-returned record.
    ///
    /// There is no speculative insertion before the server responds: the
    /// id is server-assigned, so nothing useful could be cached earlier.
    ///
    /// # Errors
    ///
    /// Returns the API failure; the cache is untouched and `error` set.
    pub async fn create(&self, draft: &TaskDraft) -> Result<Task, ApiError> {
        self.clear_error();
        match self.api.create_task(draft).await {
            Ok(task) => {
                self.state
                    .send_modify(|s| reconcile::prepend_unique(&mut s.items, task.clone()));
                Ok(task)
            }
            Err(e) => {
                self.fail(&e);
                Err(e)
            }
        }
    }

    /// Updates a task and replaces the cached record with the server's.
    /// An id the cache does not hold is a no-op on the collection.
    ///
    /// # Errors
    ///
    /// Returns the API failure; the cache is untouched and `error` set.
    pub async fn update(&self, id: &TaskId, patch: &TaskPatch) -> Result<Task, ApiError> {
        self.clear_error();
        match self.api.update_task(id, patch).await {
            Ok(task) => {
                self.state
                    .send_modify(|s| {
                        reconcile::replace_by_id(&mut s.items, task.clone());
                    });
                Ok(task)
            }
            Err(e) => {
                self.fail(&e);
                Err(e)
            }
        }
    }

    /// Deletes a task and removes the cached record.
    ///
    /// # Errors
    ///
    /// Returns the API failure; the cache is untouched and `error` set —
    /// the task stays cached until the server confirms the delete.
    pub async fn delete(&self, id: &TaskId) -> Result<(), ApiError> {
        self.clear_error();
        match self.api.delete_task(id).await {
            Ok(()) => {
                self.state.send_modify(|s| {
                    reconcile::remove_by_id(&mut s.items, id);
                });
                Ok(())
            }
            Err(e) => {
                self.fail(&e);
                Err(e)
            }
        }
    }

    /// Assigns a task to a member; same replace-on-success contract as
    /// [`TaskStore::update`].
    ///
    /// # Errors
    ///
    /// Returns the API failure; the cache is untouched and `error` set.
    pub async fn assign(&self, id: &TaskId, member: &UserId) -> Result<Task, ApiError> {
        self.clear_error();
        match self.api.assign_task(id, member).await {
            Ok(task) => {
                self.state
                    .send_modify(|s| {
                        reconcile::replace_by_id(&mut s.items, task.clone());
                    });
                Ok(task)
            }
            Err(e) => {
                self.fail(&e);
                Err(e)
            }
        }
    }

    /// Pure in-memory lookup over the cached items. `None` only means
    /// not cached — the task may well exist server-side.
    #[must_use]
    pub fn get(&self, id: &TaskId) -> Option<Task> {
        self.state.borrow().items.iter().find(|t| t.id == *id).cloned()
    }

    /// Derived read-only view over the cached items, computed on every
    /// call so it always reflects the current cache.
    #[must_use]
    pub fn filtered(&self, filter: StatusFilter) -> Vec<Task> {
        reconcile::filter_by_status(&self.state.borrow().items, filter)
    }

    fn clear_error(&self) {
        self.state.send_modify(|s| s.error = None);
    }

    fn fail(&self, e: &ApiError) {
        self.state.send_modify(|s| s.error = Some(e.to_string()));
    }
}
