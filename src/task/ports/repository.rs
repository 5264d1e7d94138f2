//! Repository port for owner-scoped task persistence.

use crate::task::domain::{OwnerId, PositionAssignment, Task, TaskId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Task persistence contract.
///
/// Every method is scoped to a single owner: implementations must never read
/// or mutate another owner's rows, and id lookups for a foreign owner's task
/// behave as if the row did not exist.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the task ID
    /// already exists.
    async fn insert(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Finds a task by identifier within the owner's scope.
    ///
    /// Returns `None` when the task does not exist or belongs to another
    /// owner.
    async fn find_by_id(&self, owner: &OwnerId, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Returns the owner's active tasks ordered by position ascending.
    async fn list_active(&self, owner: &OwnerId) -> TaskRepositoryResult<Vec<Task>>;

    /// Returns the owner's completed, non-archived tasks ordered by
    /// completion timestamp ascending.
    async fn list_completed(&self, owner: &OwnerId) -> TaskRepositoryResult<Vec<Task>>;

    /// Returns the owner's archived tasks ordered by archive timestamp
    /// ascending.
    async fn list_archived(&self, owner: &OwnerId) -> TaskRepositoryResult<Vec<Task>>;

    /// Persists changes to an existing task (flags, timestamps, position).
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not
    /// exist in the owner's scope.
    async fn update(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Applies a set of position writes as a single atomic unit.
    ///
    /// Either every assignment is applied or none is: a missing row aborts
    /// the whole rewrite so a partial write can never leave the owner's
    /// active positions non-dense.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] naming the first missing
    /// task, with no assignment applied.
    async fn update_positions(
        &self,
        owner: &OwnerId,
        assignments: &[PositionAssignment],
    ) -> TaskRepositoryResult<()>;

    /// Removes a task record.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not
    /// exist in the owner's scope.
    async fn delete(&self, owner: &OwnerId, id: TaskId) -> TaskRepositoryResult<()>;

    /// Archives every completed, non-archived task of the owner, stamping
    /// the given timestamp. Returns the number of rows archived.
    ///
    /// Each row transition is independent and re-runnable; a failure part
    /// way through leaves already-archived rows archived.
    async fn archive_completed(
        &self,
        owner: &OwnerId,
        archived_at: DateTime<Utc>,
    ) -> TaskRepositoryResult<usize>;

    /// Permanently removes every archived task of the owner. Returns the
    /// number of rows removed.
    async fn delete_archived(&self, owner: &OwnerId) -> TaskRepositoryResult<usize>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found in the owner's scope.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
