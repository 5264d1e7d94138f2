//! In-memory integration tests for the completed-today projection.

use super::helpers::{QueueHarness, harness, owner, seed_queue};
use focusq::task::domain::Task;
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn todays_completions_appear_in_the_view(harness: QueueHarness) {
    let alice = owner("alice");
    let tasks = seed_queue(&harness.lifecycle, &alice, &["first", "second"]).await;
    for task in &tasks {
        harness
            .lifecycle
            .complete_task(&alice, task.id())
            .await
            .expect("completion should succeed");
    }

    let view = harness
        .completions
        .completed_today(&alice, false)
        .await
        .expect("view should succeed");

    let expected: Vec<_> = tasks.iter().map(Task::id).collect();
    assert_eq!(view.iter().map(Task::id).collect::<Vec<_>>(), expected);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn binned_completions_show_up_only_on_request(harness: QueueHarness) {
    let alice = owner("alice");
    let tasks = seed_queue(&harness.lifecycle, &alice, &["kept", "binned"]).await;
    for task in &tasks {
        harness
            .lifecycle
            .complete_task(&alice, task.id())
            .await
            .expect("completion should succeed");
    }
    let binned_id = tasks.last().map(Task::id).expect("seeded task");
    harness
        .archive
        .archive_task(&alice, binned_id)
        .await
        .expect("archive should succeed");

    let without_bin = harness
        .completions
        .completed_today(&alice, false)
        .await
        .expect("view should succeed");
    let with_bin = harness
        .completions
        .completed_today(&alice, true)
        .await
        .expect("view should succeed");

    assert_eq!(without_bin.len(), 1);
    assert_eq!(with_bin.len(), 2);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unfinished_tasks_never_reach_the_view(harness: QueueHarness) {
    let alice = owner("alice");
    seed_queue(&harness.lifecycle, &alice, &["still queued"]).await;

    let view = harness
        .completions
        .completed_today(&alice, true)
        .await
        .expect("view should succeed");

    assert!(view.is_empty());
}
