//! Service layer for task creation, completion, and queue ordering.

use crate::task::{
    domain::{OwnerId, QueuePosition, Task, TaskDomainError, TaskId, TaskState, TaskText, queue},
    ports::{TaskRepository, TaskRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Service-level errors for task lifecycle operations.
#[derive(Debug, Error)]
pub enum TaskLifecycleError {
    /// Domain validation or state transition failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),

    /// The task does not exist in the caller's scope.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
}

/// Result type for task service operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;

/// Orchestrates the active queue: creation, completion, deletion, and the
/// skip/reorder position rewrites.
///
/// Every operation that removes a task from the active set, or reorders
/// within it, ends by restoring position density through the queue planner.
#[derive(Clone)]
pub struct TaskLifecycleService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> TaskLifecycleService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new task lifecycle service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Creates a new active task appended at the back of the owner's queue.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] when the text is empty and
    /// [`TaskLifecycleError::Repository`] when persistence fails.
    pub async fn create_task(&self, owner: &OwnerId, text: &str) -> TaskLifecycleResult<Task> {
        let task_text = TaskText::new(text)?;
        let active = self.repository.list_active(owner).await?;
        let position = queue::position_at(active.len())?;
        let task = Task::new(owner.clone(), task_text, position, &*self.clock);
        self.repository.insert(&task).await?;
        tracing::debug!(owner = %owner, task = %task.id(), position = %position, "created task");
        Ok(task)
    }

    /// Marks a task completed and compacts the remaining active positions.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] when the id is absent or
    /// foreign, and [`TaskLifecycleError::Domain`] when the task is not
    /// active.
    pub async fn complete_task(&self, owner: &OwnerId, id: TaskId) -> TaskLifecycleResult<Task> {
        let mut task = self.require(owner, id).await?;
        task.complete(&*self.clock)?;
        self.repository.update(&task).await?;
        self.compact(owner).await?;
        tracing::debug!(owner = %owner, task = %id, "completed task");
        Ok(task)
    }

    /// Deletes a task from the active or completed state.
    ///
    /// Compacts the queue when the deleted row was active. Archived rows
    /// leave the bin only through restore or permanent deletion.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] when the id is absent or
    /// foreign, and [`TaskLifecycleError::Domain`] when the task is
    /// archived.
    pub async fn delete_task(&self, owner: &OwnerId, id: TaskId) -> TaskLifecycleResult<()> {
        let task = self.require(owner, id).await?;
        if task.is_archived() {
            return Err(TaskDomainError::InvalidStateTransition {
                task_id: id,
                from: TaskState::Archived,
                to: TaskState::Deleted,
            }
            .into());
        }
        let was_active = task.state() == TaskState::Active;
        self.repository.delete(owner, id).await?;
        if was_active {
            self.compact(owner).await?;
        }
        tracing::debug!(owner = %owner, task = %id, "deleted task");
        Ok(())
    }

    /// Defers the front task to the back of the active queue.
    ///
    /// No-op when fewer than two tasks are active. Completed and archived
    /// tasks are never consulted or touched.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when the position rewrite
    /// fails; the rewrite is atomic, so a failure leaves the order
    /// unchanged.
    pub async fn skip(&self, owner: &OwnerId) -> TaskLifecycleResult<()> {
        let active = self.repository.list_active(owner).await?;
        let plan = queue::rotation_plan(&queue_snapshot(&active))?;
        if plan.is_empty() {
            return Ok(());
        }
        self.repository.update_positions(owner, &plan).await?;
        tracing::debug!(owner = %owner, queue_len = active.len(), "skipped front task");
        Ok(())
    }

    /// Rewrites the active order to the caller-supplied id sequence.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] unless the id list is an exact
    /// permutation of the owner's active set.
    pub async fn reorder(&self, owner: &OwnerId, desired: &[TaskId]) -> TaskLifecycleResult<()> {
        let active = self.repository.list_active(owner).await?;
        let plan = queue::reorder_plan(&queue_snapshot(&active), desired)?;
        if plan.is_empty() {
            return Ok(());
        }
        self.repository.update_positions(owner, &plan).await?;
        tracing::debug!(owner = %owner, queue_len = desired.len(), "reordered queue");
        Ok(())
    }

    /// Returns the owner's active tasks ordered by position.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when the lookup fails.
    pub async fn list_active(&self, owner: &OwnerId) -> TaskLifecycleResult<Vec<Task>> {
        Ok(self.repository.list_active(owner).await?)
    }

    /// Returns the owner's completed, non-archived tasks ordered by
    /// completion time.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when the lookup fails.
    pub async fn list_completed(&self, owner: &OwnerId) -> TaskLifecycleResult<Vec<Task>> {
        Ok(self.repository.list_completed(owner).await?)
    }

    /// Fetches a task or reports it missing from the owner's scope.
    async fn require(&self, owner: &OwnerId, id: TaskId) -> TaskLifecycleResult<Task> {
        self.repository
            .find_by_id(owner, id)
            .await?
            .ok_or(TaskLifecycleError::NotFound(id))
    }

    /// Rewrites active positions to their rank, restoring density.
    async fn compact(&self, owner: &OwnerId) -> TaskLifecycleResult<()> {
        let active = self.repository.list_active(owner).await?;
        let plan = queue::compaction_plan(&queue_snapshot(&active))?;
        if plan.is_empty() {
            return Ok(());
        }
        self.repository.update_positions(owner, &plan).await?;
        tracing::debug!(owner = %owner, rewritten = plan.len(), "compacted queue positions");
        Ok(())
    }
}

/// Projects tasks onto the (id, position) pairs the queue planner consumes.
fn queue_snapshot(tasks: &[Task]) -> Vec<(TaskId, QueuePosition)> {
    tasks.iter().map(|task| (task.id(), task.position())).collect()
}
