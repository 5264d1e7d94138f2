//! Domain model for the task lifecycle and ordering engine.
//!
//! The task domain models per-owner task creation, completion, the
//! soft-delete bin, and the dense position order of the active queue while
//! keeping all infrastructure concerns outside of the domain boundary.

mod error;
mod ids;
mod optimistic;
pub mod queue;
mod task;

pub use error::{ParseTaskStateError, TaskDomainError};
pub use ids::{OwnerId, QueuePosition, TaskId, TaskText};
pub use optimistic::{OptimisticQueue, QueueCommand};
pub use queue::PositionAssignment;
pub use task::{PersistedTaskData, Task, TaskState};
