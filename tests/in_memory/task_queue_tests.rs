//! In-memory integration tests for active queue ordering.

use super::helpers::{QueueHarness, assert_active_order, harness, owner, seed_queue};
use focusq::task::{
    domain::{Task, TaskDomainError, TaskState},
    services::TaskLifecycleError,
};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn backlog_processes_front_first_with_skip_deferral(harness: QueueHarness) {
    let alice = owner("alice");
    let tasks = seed_queue(
        &harness.lifecycle,
        &alice,
        &["buy milk", "call mom", "read book"],
    )
    .await;
    let (milk, mom, book) = match tasks.as_slice() {
        [first, second, third] => (first.id(), second.id(), third.id()),
        other => panic!("expected three tasks, got {}", other.len()),
    };

    let initial = harness
        .lifecycle
        .list_active(&alice)
        .await
        .expect("listing should succeed");
    assert_active_order(&initial, &[milk, mom, book]);

    harness
        .lifecycle
        .skip(&alice)
        .await
        .expect("skip should succeed");
    let after_skip = harness
        .lifecycle
        .list_active(&alice)
        .await
        .expect("listing should succeed");
    assert_active_order(&after_skip, &[mom, book, milk]);

    harness
        .lifecycle
        .complete_task(&alice, mom)
        .await
        .expect("completion should succeed");
    let after_complete = harness
        .lifecycle
        .list_active(&alice)
        .await
        .expect("listing should succeed");
    assert_active_order(&after_complete, &[book, milk]);

    let completed = harness
        .lifecycle
        .list_completed(&alice)
        .await
        .expect("listing should succeed");
    assert_eq!(completed.iter().map(Task::id).collect::<Vec<_>>(), vec![mom]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn skip_cycles_through_the_whole_queue(harness: QueueHarness) {
    let alice = owner("alice");
    let tasks = seed_queue(&harness.lifecycle, &alice, &["one", "two", "three"]).await;
    let original: Vec<_> = tasks.iter().map(Task::id).collect();

    for _ in 0..tasks.len() {
        harness
            .lifecycle
            .skip(&alice)
            .await
            .expect("skip should succeed");
    }

    let active = harness
        .lifecycle
        .list_active(&alice)
        .await
        .expect("listing should succeed");
    assert_active_order(&active, &original);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn skip_with_a_single_task_changes_nothing(harness: QueueHarness) {
    let alice = owner("alice");
    let tasks = seed_queue(&harness.lifecycle, &alice, &["only task"]).await;

    harness
        .lifecycle
        .skip(&alice)
        .await
        .expect("skip should succeed");

    let active = harness
        .lifecycle
        .list_active(&alice)
        .await
        .expect("listing should succeed");
    let expected: Vec<_> = tasks.iter().map(Task::id).collect();
    assert_active_order(&active, &expected);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reorder_rewrites_positions_to_the_requested_order(harness: QueueHarness) {
    let alice = owner("alice");
    let tasks = seed_queue(&harness.lifecycle, &alice, &["one", "two", "three"]).await;
    let mut desired: Vec<_> = tasks.iter().map(Task::id).collect();
    desired.reverse();

    harness
        .lifecycle
        .reorder(&alice, &desired)
        .await
        .expect("reorder should succeed");

    let active = harness
        .lifecycle
        .list_active(&alice)
        .await
        .expect("listing should succeed");
    assert_active_order(&active, &desired);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reorder_rejects_a_stale_id_list(harness: QueueHarness) {
    let alice = owner("alice");
    let tasks = seed_queue(&harness.lifecycle, &alice, &["one", "two"]).await;
    let stale: Vec<_> = tasks.iter().map(Task::id).take(1).collect();

    let result = harness.lifecycle.reorder(&alice, &stale).await;

    assert!(matches!(
        result,
        Err(TaskLifecycleError::Domain(TaskDomainError::QueueMismatch))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn owners_queues_evolve_independently(harness: QueueHarness) {
    let alice = owner("alice");
    let bob = owner("bob");
    let alice_tasks = seed_queue(&harness.lifecycle, &alice, &["a1", "a2"]).await;
    let bob_tasks = seed_queue(&harness.lifecycle, &bob, &["b1", "b2"]).await;

    harness
        .lifecycle
        .skip(&alice)
        .await
        .expect("skip should succeed");

    let alice_active = harness
        .lifecycle
        .list_active(&alice)
        .await
        .expect("listing should succeed");
    let bob_active = harness
        .lifecycle
        .list_active(&bob)
        .await
        .expect("listing should succeed");

    let alice_expected: Vec<_> = alice_tasks.iter().rev().map(Task::id).collect();
    let bob_expected: Vec<_> = bob_tasks.iter().map(Task::id).collect();
    assert_active_order(&alice_active, &alice_expected);
    assert_active_order(&bob_active, &bob_expected);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn completing_every_task_empties_the_queue(harness: QueueHarness) {
    let alice = owner("alice");
    let tasks = seed_queue(&harness.lifecycle, &alice, &["one", "two"]).await;

    for task in &tasks {
        let completed = harness
            .lifecycle
            .complete_task(&alice, task.id())
            .await
            .expect("completion should succeed");
        assert_eq!(completed.state(), TaskState::Completed);
    }

    let active = harness
        .lifecycle
        .list_active(&alice)
        .await
        .expect("listing should succeed");
    assert!(active.is_empty());
    let completed = harness
        .lifecycle
        .list_completed(&alice)
        .await
        .expect("listing should succeed");
    assert_eq!(completed.len(), tasks.len());
}
