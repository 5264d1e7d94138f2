//! When steps for focus queue BDD scenarios.

use super::world::{TaskQueueWorld, run_async, task_id_by_text};
use eyre::WrapErr;
use focusq::task::domain::Task;
use rstest_bdd_macros::when;

#[when("the front task is skipped")]
fn skip_front_task(world: &mut TaskQueueWorld) -> Result<(), eyre::Report> {
    let owner = world.current_owner()?;
    run_async(world.lifecycle.skip(&owner)).wrap_err("skip front task")?;
    Ok(())
}

#[when("the front task is completed")]
fn complete_front_task(world: &mut TaskQueueWorld) -> Result<(), eyre::Report> {
    let owner = world.current_owner()?;
    let active = run_async(world.lifecycle.list_active(&owner)).wrap_err("list active tasks")?;
    let front = active
        .first()
        .map(Task::id)
        .ok_or_else(|| eyre::eyre!("no active task to complete"))?;
    run_async(world.lifecycle.complete_task(&owner, front)).wrap_err("complete front task")?;
    Ok(())
}

#[when(r#"the task "{text}" is restored"#)]
fn restore_task(world: &mut TaskQueueWorld, text: String) -> Result<(), eyre::Report> {
    let owner = world.current_owner()?;
    let archived = run_async(world.archive.list_archived(&owner)).wrap_err("list bin")?;
    let id = task_id_by_text(&archived, &text)?;
    run_async(world.archive.restore_task(&owner, id)).wrap_err("restore task")?;
    Ok(())
}

#[when(r#"the task "{text}" is archived"#)]
fn archive_task(world: &mut TaskQueueWorld, text: String) -> Result<(), eyre::Report> {
    let owner = world.current_owner()?;
    let mut candidates = run_async(world.lifecycle.list_active(&owner))
        .wrap_err("list active tasks")?;
    candidates.extend(
        run_async(world.lifecycle.list_completed(&owner)).wrap_err("list completed tasks")?,
    );
    let id = task_id_by_text(&candidates, &text)?;
    let result = run_async(world.archive.archive_task(&owner, id));
    world.last_archive_result = Some(result);
    Ok(())
}

#[when("the bin is emptied")]
fn empty_bin(world: &mut TaskQueueWorld) -> Result<(), eyre::Report> {
    let owner = world.current_owner()?;
    run_async(world.archive.empty_bin(&owner)).wrap_err("empty bin")?;
    Ok(())
}
