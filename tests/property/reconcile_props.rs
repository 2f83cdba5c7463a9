//! Property-based tests for the task cache reconciliation helpers.
//!
//! Verifies the collection invariant — no two cached entries share an
//! id — under arbitrary sequences of reconcile operations, and that the
//! derived status views are consistent projections of the cache.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::collections::HashSet;

use proptest::prelude::*;

use taskdeck::tasks::StatusFilter;
use taskdeck::tasks::reconcile::{
    dedup_by_id, filter_by_status, prepend_unique, remove_by_id, replace_by_id,
};
use taskdeck_model::task::{Task, TaskId, TaskStatus};

/// Builds a task from a small id pool so operations collide often.
fn make_task(n: u8, status: TaskStatus) -> Task {
    Task {
        id: TaskId::new(format!("t{n}")),
        title: format!("task {n}"),
        description: None,
        status,
        assigned_to: None,
        photo_url: None,
        created_at: chrono::DateTime::UNIX_EPOCH,
        updated_at: chrono::DateTime::UNIX_EPOCH,
    }
}

/// Strategy for generating arbitrary task statuses.
fn arb_status() -> impl Strategy<Value = TaskStatus> {
    prop_oneof![
        Just(TaskStatus::Pending),
        Just(TaskStatus::InProgress),
        Just(TaskStatus::Completed),
    ]
}

/// Strategy for generating tasks over an 8-id pool.
fn arb_task() -> impl Strategy<Value = Task> {
    (0u8..8, arb_status()).prop_map(|(n, status)| make_task(n, status))
}

/// One reconcile operation, mirroring what the store applies on each
/// server response.
#[derive(Debug, Clone)]
enum Op {
    /// Wholesale refresh from a fetched list.
    Refresh(Vec<Task>),
    /// Prepend of a created task.
    Create(Task),
    /// Replacement after update/assign.
    Replace(Task),
    /// Removal after delete.
    Remove(u8),
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        prop::collection::vec(arb_task(), 0..6).prop_map(Op::Refresh),
        arb_task().prop_map(Op::Create),
        arb_task().prop_map(Op::Replace),
        (0u8..8).prop_map(Op::Remove),
    ]
}

fn apply(items: &mut Vec<Task>, op: Op) {
    match op {
        Op::Refresh(list) => *items = dedup_by_id(list),
        Op::Create(task) => prepend_unique(items, task),
        Op::Replace(task) => {
            replace_by_id(items, task);
        }
        Op::Remove(n) => {
            remove_by_id(items, &TaskId::new(format!("t{n}")));
        }
    }
}

fn ids_are_unique(items: &[Task]) -> bool {
    let mut seen = HashSet::new();
    items.iter().all(|t| seen.insert(t.id.clone()))
}

proptest! {
    #[test]
    fn ids_stay_unique_under_any_op_sequence(
        ops in prop::collection::vec(arb_op(), 0..24)
    ) {
        let mut items = Vec::new();
        for op in ops {
            apply(&mut items, op);
            prop_assert!(ids_are_unique(&items));
        }
    }

    #[test]
    fn create_of_an_unknown_id_goes_first(
        seed in prop::collection::vec(arb_task(), 0..6),
        status in arb_status()
    ) {
        let mut items = dedup_by_id(seed);
        // Id 9 is outside the generator's pool, so it is always new.
        let fresh = make_task(9, status);
        prepend_unique(&mut items, fresh.clone());
        prop_assert_eq!(&items[0], &fresh);
        prop_assert!(ids_are_unique(&items));
    }

    #[test]
    fn replace_never_changes_membership_or_order(
        seed in prop::collection::vec(arb_task(), 0..8),
        task in arb_task()
    ) {
        let mut items = dedup_by_id(seed);
        let ids_before: Vec<TaskId> = items.iter().map(|t| t.id.clone()).collect();
        replace_by_id(&mut items, task);
        let ids_after: Vec<TaskId> = items.iter().map(|t| t.id.clone()).collect();
        prop_assert_eq!(ids_before, ids_after);
    }

    #[test]
    fn remove_leaves_the_id_absent_and_others_intact(
        seed in prop::collection::vec(arb_task(), 0..8),
        n in 0u8..8
    ) {
        let mut items = dedup_by_id(seed);
        let id = TaskId::new(format!("t{n}"));
        let others: Vec<TaskId> = items
            .iter()
            .map(|t| t.id.clone())
            .filter(|other| *other != id)
            .collect();

        remove_by_id(&mut items, &id);

        prop_assert!(items.iter().all(|t| t.id != id));
        let remaining: Vec<TaskId> = items.iter().map(|t| t.id.clone()).collect();
        prop_assert_eq!(remaining, others);
    }

    #[test]
    fn filtered_view_is_a_projection_of_the_items(
        seed in prop::collection::vec(arb_task(), 0..10),
        status in arb_status()
    ) {
        let items = dedup_by_id(seed);

        let view = filter_by_status(&items, StatusFilter::Only(status));
        prop_assert!(view.iter().all(|t| t.status == status));
        let expected: Vec<Task> = items
            .iter()
            .filter(|t| t.status == status)
            .cloned()
            .collect();
        prop_assert_eq!(view, expected);

        let all = filter_by_status(&items, StatusFilter::All);
        prop_assert_eq!(all, items);
    }

    #[test]
    fn refresh_keeps_first_occurrence_per_id(
        seed in prop::collection::vec(arb_task(), 0..12)
    ) {
        let deduped = dedup_by_id(seed.clone());
        prop_assert!(ids_are_unique(&deduped));
        // Every kept entry is the first task with its id in server order.
        for task in &deduped {
            let first = seed.iter().find(|t| t.id == task.id).unwrap();
            prop_assert_eq!(task, first);
        }
    }
}
