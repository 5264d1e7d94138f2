//! Task aggregate root and lifecycle state machine.

use super::{OwnerId, ParseTaskStateError, QueuePosition, TaskDomainError, TaskId, TaskText};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Task lifecycle state, derived from the completion and archive flags.
///
/// `Deleted` is a tombstone: it never appears on a live record and exists
/// only so transition failures can name their target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    /// Task is queued and eligible to appear in the working queue.
    Active,
    /// Task is marked done and no longer holds a queue position.
    Completed,
    /// Completed task soft-deleted into the recoverable bin.
    Archived,
    /// Record removed from storage.
    Deleted,
}

impl TaskState {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Archived => "archived",
            Self::Deleted => "deleted",
        }
    }

    /// Returns whether the lifecycle permits moving from `self` to `to`.
    #[must_use]
    pub const fn can_transition_to(self, to: Self) -> bool {
        matches!(
            (self, to),
            (Self::Active, Self::Completed | Self::Deleted)
                | (Self::Completed, Self::Archived | Self::Deleted)
                | (Self::Archived, Self::Active | Self::Deleted)
        )
    }

    /// Returns whether the state admits no further transitions.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Deleted)
    }
}

impl TryFrom<&str> for TaskState {
    type Error = ParseTaskStateError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            "archived" => Ok(Self::Archived),
            "deleted" => Ok(Self::Deleted),
            _ => Err(ParseTaskStateError(value.to_owned())),
        }
    }
}

/// Task aggregate root.
///
/// Field layout mirrors the persisted row: the completion and archive flags
/// are stored alongside their timestamps, and every transition method writes
/// the pair together so `completed_at` is non-null exactly when `completed`
/// holds (and likewise for `archived`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    owner: OwnerId,
    text: TaskText,
    position: QueuePosition,
    completed: bool,
    completed_at: Option<DateTime<Utc>>,
    archived: bool,
    archived_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted owner identifier.
    pub owner: OwnerId,
    /// Persisted task text.
    pub text: TaskText,
    /// Persisted queue position.
    pub position: QueuePosition,
    /// Persisted completion flag.
    pub completed: bool,
    /// Persisted completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
    /// Persisted archive flag.
    pub archived: bool,
    /// Persisted archive timestamp.
    pub archived_at: Option<DateTime<Utc>>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new active task at the given queue position.
    #[must_use]
    pub fn new(owner: OwnerId, text: TaskText, position: QueuePosition, clock: &impl Clock) -> Self {
        Self {
            id: TaskId::new(),
            owner,
            text,
            position,
            completed: false,
            completed_at: None,
            archived: false,
            archived_at: None,
            created_at: clock.utc(),
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        debug_assert!(
            !data.archived || data.completed,
            "archived rows must be completed"
        );
        debug_assert!(
            data.completed == data.completed_at.is_some(),
            "completed flag and timestamp must be set together"
        );
        debug_assert!(
            data.archived == data.archived_at.is_some(),
            "archived flag and timestamp must be set together"
        );
        Self {
            id: data.id,
            owner: data.owner,
            text: data.text,
            position: data.position,
            completed: data.completed,
            completed_at: data.completed_at,
            archived: data.archived,
            archived_at: data.archived_at,
            created_at: data.created_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the owning user's identifier.
    #[must_use]
    pub const fn owner(&self) -> &OwnerId {
        &self.owner
    }

    /// Returns the task text.
    #[must_use]
    pub const fn text(&self) -> &TaskText {
        &self.text
    }

    /// Returns the queue position.
    ///
    /// Meaningless once the task is completed; it is not renumbered for
    /// completed or archived tasks.
    #[must_use]
    pub const fn position(&self) -> QueuePosition {
        self.position
    }

    /// Returns the completion flag.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.completed
    }

    /// Returns the completion timestamp, if set.
    #[must_use]
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Returns the archive flag.
    #[must_use]
    pub const fn is_archived(&self) -> bool {
        self.archived
    }

    /// Returns the archive timestamp, if set.
    #[must_use]
    pub const fn archived_at(&self) -> Option<DateTime<Utc>> {
        self.archived_at
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the derived lifecycle state.
    #[must_use]
    pub const fn state(&self) -> TaskState {
        if self.archived {
            TaskState::Archived
        } else if self.completed {
            TaskState::Completed
        } else {
            TaskState::Active
        }
    }

    /// Marks the task completed.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStateTransition`] unless the task is
    /// active.
    pub fn complete(&mut self, clock: &impl Clock) -> Result<(), TaskDomainError> {
        self.ensure_transition(TaskState::Completed)?;
        self.completed = true;
        self.completed_at = Some(clock.utc());
        Ok(())
    }

    /// Moves the completed task into the bin.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStateTransition`] unless the task is
    /// completed and not already archived.
    pub fn archive(&mut self, clock: &impl Clock) -> Result<(), TaskDomainError> {
        self.ensure_transition(TaskState::Archived)?;
        self.archived = true;
        self.archived_at = Some(clock.utc());
        Ok(())
    }

    /// Re-admits an archived task to the active queue at the given position.
    ///
    /// Both flag/timestamp pairs are cleared; the caller appends the task at
    /// the back of the queue, never at its pre-archive spot.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStateTransition`] unless the task is
    /// archived.
    pub fn restore(&mut self, position: QueuePosition) -> Result<(), TaskDomainError> {
        self.ensure_transition(TaskState::Active)?;
        self.completed = false;
        self.completed_at = None;
        self.archived = false;
        self.archived_at = None;
        self.position = position;
        Ok(())
    }

    /// Rejects the transition unless the state machine permits it.
    const fn ensure_transition(&self, to: TaskState) -> Result<(), TaskDomainError> {
        let from = self.state();
        if from.can_transition_to(to) {
            Ok(())
        } else {
            Err(TaskDomainError::InvalidStateTransition {
                task_id: self.id,
                from,
                to,
            })
        }
    }
}
