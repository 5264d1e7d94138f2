//! In-memory integration tests for the archive bin.

use super::helpers::{QueueHarness, assert_active_order, harness, owner, seed_queue};
use focusq::task::{
    domain::{Task, TaskDomainError, TaskState},
    services::TaskLifecycleError,
};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn completed_backlog_round_trips_through_the_bin(harness: QueueHarness) {
    let alice = owner("alice");
    let tasks = seed_queue(&harness.lifecycle, &alice, &["one", "two", "three"]).await;
    for task in &tasks {
        harness
            .lifecycle
            .complete_task(&alice, task.id())
            .await
            .expect("completion should succeed");
    }

    let archived = harness
        .archive
        .archive_completed(&alice)
        .await
        .expect("bulk archive should succeed");
    assert_eq!(archived, 3);

    let bin = harness
        .archive
        .list_archived(&alice)
        .await
        .expect("listing should succeed");
    assert_eq!(bin.len(), 3);
    assert!(bin.iter().all(|task| task.state() == TaskState::Archived));

    let first_binned = bin.first().map(Task::id).expect("bin is non-empty");
    let restored = harness
        .archive
        .restore_task(&alice, first_binned)
        .await
        .expect("restore should succeed");
    assert_eq!(restored.state(), TaskState::Active);
    assert_eq!(restored.position().value(), 0);

    let active = harness
        .lifecycle
        .list_active(&alice)
        .await
        .expect("listing should succeed");
    assert_active_order(&active, &[first_binned]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn restore_appends_behind_the_existing_queue(harness: QueueHarness) {
    let alice = owner("alice");
    let binned = seed_queue(&harness.lifecycle, &alice, &["binned"]).await;
    let binned_id = binned.first().map(Task::id).expect("seeded task");
    harness
        .lifecycle
        .complete_task(&alice, binned_id)
        .await
        .expect("completion should succeed");
    harness
        .archive
        .archive_task(&alice, binned_id)
        .await
        .expect("archive should succeed");

    let queued = seed_queue(&harness.lifecycle, &alice, &["first", "second"]).await;
    let restored = harness
        .archive
        .restore_task(&alice, binned_id)
        .await
        .expect("restore should succeed");

    assert_eq!(restored.position().value(), 2);
    let active = harness
        .lifecycle
        .list_active(&alice)
        .await
        .expect("listing should succeed");
    let mut expected: Vec<_> = queued.iter().map(Task::id).collect();
    expected.push(binned_id);
    assert_active_order(&active, &expected);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn empty_bin_is_irreversible(harness: QueueHarness) {
    let alice = owner("alice");
    let tasks = seed_queue(&harness.lifecycle, &alice, &["one", "two", "three"]).await;
    for task in &tasks {
        harness
            .lifecycle
            .complete_task(&alice, task.id())
            .await
            .expect("completion should succeed");
    }
    harness
        .archive
        .archive_completed(&alice)
        .await
        .expect("bulk archive should succeed");

    let removed = harness
        .archive
        .empty_bin(&alice)
        .await
        .expect("empty bin should succeed");
    assert_eq!(removed, 3);

    let bin = harness
        .archive
        .list_archived(&alice)
        .await
        .expect("listing should succeed");
    assert!(bin.is_empty());

    for task in &tasks {
        let result = harness.archive.restore_task(&alice, task.id()).await;
        assert!(matches!(result, Err(TaskLifecycleError::NotFound(_))));
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn archiving_skips_tasks_that_are_still_active(harness: QueueHarness) {
    let alice = owner("alice");
    let tasks = seed_queue(&harness.lifecycle, &alice, &["active", "done"]).await;
    let done_id = tasks.last().map(Task::id).expect("seeded task");
    harness
        .lifecycle
        .complete_task(&alice, done_id)
        .await
        .expect("completion should succeed");

    let archived = harness
        .archive
        .archive_completed(&alice)
        .await
        .expect("bulk archive should succeed");

    assert_eq!(archived, 1);
    let active = harness
        .lifecycle
        .list_active(&alice)
        .await
        .expect("listing should succeed");
    let active_id = tasks.first().map(Task::id).expect("seeded task");
    assert_active_order(&active, &[active_id]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn direct_archive_of_an_active_task_is_rejected(harness: QueueHarness) {
    let alice = owner("alice");
    let tasks = seed_queue(&harness.lifecycle, &alice, &["active"]).await;
    let task_id = tasks.first().map(Task::id).expect("seeded task");

    let result = harness.archive.archive_task(&alice, task_id).await;

    assert!(matches!(
        result,
        Err(TaskLifecycleError::Domain(
            TaskDomainError::InvalidStateTransition { .. }
        ))
    ));
}
