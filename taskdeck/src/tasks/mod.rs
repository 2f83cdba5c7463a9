//! Task collection cache for the active session.
//!
//! [`TaskStore`] owns the in-memory task list and reconciles it against
//! the server's authoritative responses: wholesale refresh on fetch,
//! prepend of the server-returned record on create, whole-record
//! replacement on update/assign, removal on delete. Consumers observe a
//! [`TaskListState`] snapshot through a watch channel.
//!
//! # Concurrency
//!
//! Operations do not serialize against each other and nothing is ever
//! cancelled. Two concurrent mutations of the same task race, and the
//! last response to arrive wins in the cache — there is no version check
//! or conflict detection. Likewise, two overlapping `fetch_all` calls can
//! complete out of order and leave the cache reflecting the stale filter
//! set; callers that care must avoid overlapping fetches.

pub mod reconcile;
pub mod store;

pub use store::TaskStore;

use taskdeck_model::task::{Task, TaskStatus};

/// Snapshot of the task collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskListState {
    /// Cached tasks in server order; optimistic creates are prepended.
    /// No two entries share an id.
    pub items: Vec<Task>,
    /// Whether a fetch is in flight.
    pub loading: bool,
    /// Message of the most recent failed operation, cleared when the
    /// next operation starts.
    pub error: Option<String>,
}

/// Status filter for derived, read-only views over the cached items.
///
/// Views are always computed from the current items and never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    /// Every cached task.
    All,
    /// Only tasks in the given status.
    Only(TaskStatus),
}
