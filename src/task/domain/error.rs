//! Error types for task domain validation and state transitions.

use super::{TaskId, TaskState};
use thiserror::Error;

/// Errors returned while constructing or transitioning domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task text is empty after trimming.
    #[error("task text must not be empty")]
    EmptyText,

    /// The owner identifier is empty after trimming.
    #[error("owner identifier must not be empty")]
    EmptyOwner,

    /// The queue position exceeds the range the schema can persist.
    #[error("queue position {0} exceeds the persistable range")]
    PositionOutOfRange(u64),

    /// A reorder request named a different id set than the active queue.
    #[error("id list does not match the owner's active queue")]
    QueueMismatch,

    /// The operation is not valid from the task's current state.
    #[error("invalid transition for task {task_id}: {} -> {}", from.as_str(), to.as_str())]
    InvalidStateTransition {
        /// Task the transition was attempted on.
        task_id: TaskId,
        /// State the task is currently in.
        from: TaskState,
        /// State the operation would have produced.
        to: TaskState,
    },
}

/// Error returned while parsing task states from their string form.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task state: {0}")]
pub struct ParseTaskStateError(pub String);
