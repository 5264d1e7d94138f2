//! Then steps for focus queue BDD scenarios.

use super::world::{TaskQueueWorld, run_async};
use eyre::WrapErr;
use focusq::task::{domain::TaskDomainError, services::TaskLifecycleError};
use rstest_bdd_macros::then;

#[then(r#"the active queue order is "{order}""#)]
fn active_queue_order_is(world: &TaskQueueWorld, order: String) -> Result<(), eyre::Report> {
    let owner = world.current_owner()?;
    let active = run_async(world.lifecycle.list_active(&owner)).wrap_err("list active tasks")?;

    let actual: Vec<&str> = active.iter().map(|task| task.text().as_str()).collect();
    let expected: Vec<&str> = order.split(", ").collect();
    if actual != expected {
        return Err(eyre::eyre!("expected order {expected:?}, found {actual:?}"));
    }

    for (rank, task) in active.iter().enumerate() {
        let rank_value = u32::try_from(rank).wrap_err("rank fits a position")?;
        if task.position().value() != rank_value {
            return Err(eyre::eyre!(
                "position of {:?} is {}, expected {rank_value}",
                task.text().as_str(),
                task.position().value()
            ));
        }
    }
    Ok(())
}

#[then("the active queue is empty")]
fn active_queue_is_empty(world: &TaskQueueWorld) -> Result<(), eyre::Report> {
    let owner = world.current_owner()?;
    let active = run_async(world.lifecycle.list_active(&owner)).wrap_err("list active tasks")?;
    eyre::ensure!(active.is_empty(), "expected no active tasks");
    Ok(())
}

#[then(r#"the completed list holds "{text}""#)]
fn completed_list_holds(world: &TaskQueueWorld, text: String) -> Result<(), eyre::Report> {
    let owner = world.current_owner()?;
    let completed =
        run_async(world.lifecycle.list_completed(&owner)).wrap_err("list completed tasks")?;
    let found = completed
        .iter()
        .any(|task| task.text().as_str() == text.as_str());
    eyre::ensure!(found, "completed list does not hold {text:?}");
    Ok(())
}

#[then("the bin is empty")]
fn bin_is_empty(world: &TaskQueueWorld) -> Result<(), eyre::Report> {
    let owner = world.current_owner()?;
    let archived = run_async(world.archive.list_archived(&owner)).wrap_err("list bin")?;
    eyre::ensure!(archived.is_empty(), "expected an empty bin");
    Ok(())
}

#[then("the operation fails with an invalid state error")]
fn operation_fails_with_invalid_state(world: &TaskQueueWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_archive_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing archive result in scenario world"))?;

    if !matches!(
        result,
        Err(TaskLifecycleError::Domain(
            TaskDomainError::InvalidStateTransition { .. }
        ))
    ) {
        return Err(eyre::eyre!(
            "expected InvalidStateTransition error, got {result:?}"
        ));
    }
    Ok(())
}
