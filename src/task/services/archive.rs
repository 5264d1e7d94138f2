//! Service layer for the soft-delete bin.

use super::{TaskLifecycleError, TaskLifecycleResult};
use crate::task::{
    domain::{OwnerId, Task, TaskDomainError, TaskId, TaskState, queue},
    ports::TaskRepository,
};
use mockable::Clock;
use std::sync::Arc;

/// Orchestrates the bin: single and bulk archival, restore, and permanent
/// deletion.
///
/// None of these operations touch active positions except restore, which
/// appends at the back of the queue without re-entering compaction.
#[derive(Clone)]
pub struct ArchiveService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> ArchiveService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new archive service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Moves a completed task into the bin.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] when the id is absent or
    /// foreign, and [`TaskLifecycleError::Domain`] when the task is not
    /// completed or is already archived.
    pub async fn archive_task(&self, owner: &OwnerId, id: TaskId) -> TaskLifecycleResult<Task> {
        let mut task = self.require(owner, id).await?;
        task.archive(&*self.clock)?;
        self.repository.update(&task).await?;
        tracing::debug!(owner = %owner, task = %id, "archived task");
        Ok(task)
    }

    /// Moves every completed, non-archived task of the owner into the bin.
    ///
    /// Returns the number of tasks archived. Each row transition is
    /// independent and re-runnable, so a partial failure leaves the batch
    /// resumable.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when the bulk update
    /// fails.
    pub async fn archive_completed(&self, owner: &OwnerId) -> TaskLifecycleResult<usize> {
        let archived = self
            .repository
            .archive_completed(owner, self.clock.utc())
            .await?;
        tracing::info!(owner = %owner, archived, "archived completed tasks");
        Ok(archived)
    }

    /// Restores an archived task to the back of the active queue.
    ///
    /// The task takes position equal to the current active count; its
    /// original spot is not recoverable.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] when the id is absent or
    /// foreign, and [`TaskLifecycleError::Domain`] when the task is not
    /// archived.
    pub async fn restore_task(&self, owner: &OwnerId, id: TaskId) -> TaskLifecycleResult<Task> {
        let mut task = self.require(owner, id).await?;
        let active = self.repository.list_active(owner).await?;
        let position = queue::position_at(active.len())?;
        task.restore(position)?;
        self.repository.update(&task).await?;
        tracing::debug!(owner = %owner, task = %id, position = %position, "restored task");
        Ok(task)
    }

    /// Permanently removes an archived task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] when the id is absent or
    /// foreign, and [`TaskLifecycleError::Domain`] when the task is not in
    /// the bin.
    pub async fn permanently_delete(&self, owner: &OwnerId, id: TaskId) -> TaskLifecycleResult<()> {
        let task = self.require(owner, id).await?;
        if !task.is_archived() {
            return Err(TaskDomainError::InvalidStateTransition {
                task_id: id,
                from: task.state(),
                to: TaskState::Deleted,
            }
            .into());
        }
        self.repository.delete(owner, id).await?;
        tracing::debug!(owner = %owner, task = %id, "permanently deleted task");
        Ok(())
    }

    /// Permanently removes every archived task of the owner.
    ///
    /// Returns the number of tasks removed. Irreversible.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when the bulk delete
    /// fails.
    pub async fn empty_bin(&self, owner: &OwnerId) -> TaskLifecycleResult<usize> {
        let removed = self.repository.delete_archived(owner).await?;
        tracing::info!(owner = %owner, removed, "emptied bin");
        Ok(removed)
    }

    /// Returns the owner's archived tasks ordered by archive time.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when the lookup fails.
    pub async fn list_archived(&self, owner: &OwnerId) -> TaskLifecycleResult<Vec<Task>> {
        Ok(self.repository.list_archived(owner).await?)
    }

    /// Fetches a task or reports it missing from the owner's scope.
    async fn require(&self, owner: &OwnerId, id: TaskId) -> TaskLifecycleResult<Task> {
        self.repository
            .find_by_id(owner, id)
            .await?
            .ok_or(TaskLifecycleError::NotFound(id))
    }
}
