//! Pure list reconciliation for the task cache.
//!
//! Every mutation of the cached task list funnels through these helpers
//! so the collection invariant — no two entries share an id — holds no
//! matter what the server returns.

use std::collections::HashSet;

use taskdeck_model::task::{Task, TaskId};

use super::StatusFilter;

/// Normalizes a freshly fetched list, dropping entries whose id was
/// already seen (first occurrence wins, server order preserved).
#[must_use]
pub fn dedup_by_id(items: Vec<Task>) -> Vec<Task> {
    let mut seen: HashSet<TaskId> = HashSet::with_capacity(items.len());
    items
        .into_iter()
        .filter(|task| seen.insert(task.id.clone()))
        .collect()
}

/// Prepends a newly created task (newest-first insertion).
///
/// If the server returned an id that is somehow already cached, the
/// existing entry is replaced in place instead of prepending a duplicate.
pub fn prepend_unique(items: &mut Vec<Task>, task: Task) {
    if !replace_by_id(items, task.clone()) {
        items.insert(0, task);
    }
}

/// Replaces the entry with the same id wholesale, returning whether a
/// replacement happened. A missing id is a no-op on the list.
pub fn replace_by_id(items: &mut [Task], task: Task) -> bool {
    match items.iter_mut().find(|t| t.id == task.id) {
        Some(slot) => {
            *slot = task;
            true
        }
        None => false,
    }
}

/// Removes the entry with the given id, returning whether one existed.
/// A missing id is a no-op on the list.
pub fn remove_by_id(items: &mut Vec<Task>, id: &TaskId) -> bool {
    let before = items.len();
    items.retain(|t| t.id != *id);
    items.len() != before
}

/// Computes the derived status view over the cached items.
#[must_use]
pub fn filter_by_status(items: &[Task], filter: StatusFilter) -> Vec<Task> {
    match filter {
        StatusFilter::All => items.to_vec(),
        StatusFilter::Only(status) => items
            .iter()
            .filter(|t| t.status == status)
            .cloned()
            .collect(),
    }
}
