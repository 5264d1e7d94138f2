//! In-memory task repository.
//!
//! Backs the client-held standalone copy of the queue and the lifecycle
//! test suites. The single `RwLock` serializes writers; the client copy has
//! no concurrent writers by construction, so no finer locking is needed.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::task::{
    domain::{
        OwnerId, PersistedTaskData, PositionAssignment, QueuePosition, Task, TaskId, TaskState,
    },
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};

/// Thread-safe in-memory task repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<InMemoryTaskState>>,
}

#[derive(Debug, Default)]
struct InMemoryTaskState {
    tasks: HashMap<TaskId, Task>,
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Rebuilds a task row with all persisted fields copied from `task`.
fn persisted_data(task: &Task) -> PersistedTaskData {
    PersistedTaskData {
        id: task.id(),
        owner: task.owner().clone(),
        text: task.text().clone(),
        position: task.position(),
        completed: task.is_completed(),
        completed_at: task.completed_at(),
        archived: task.is_archived(),
        archived_at: task.archived_at(),
        created_at: task.created_at(),
    }
}

/// Copies a task row with its position rewritten.
fn with_position(task: &Task, position: QueuePosition) -> Task {
    let mut data = persisted_data(task);
    data.position = position;
    Task::from_persisted(data)
}

/// Copies a task row with the archive flag and timestamp set.
fn archived_copy(task: &Task, archived_at: DateTime<Utc>) -> Task {
    let mut data = persisted_data(task);
    data.archived = true;
    data.archived_at = Some(archived_at);
    Task::from_persisted(data)
}

/// Collects the owner's tasks matching `keep`, ordered by `order_key`.
fn select_sorted<K: Ord>(
    state: &InMemoryTaskState,
    owner: &OwnerId,
    keep: impl Fn(&Task) -> bool,
    order_key: impl Fn(&Task) -> K,
) -> Vec<Task> {
    let mut selected: Vec<Task> = state
        .tasks
        .values()
        .filter(|task| task.owner() == owner && keep(task))
        .cloned()
        .collect();
    selected.sort_by_key(|task| order_key(task));
    selected
}

impl InMemoryTaskRepository {
    fn read_state(
        &self,
    ) -> TaskRepositoryResult<std::sync::RwLockReadGuard<'_, InMemoryTaskState>> {
        self.state.read().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write_state(
        &self,
    ) -> TaskRepositoryResult<std::sync::RwLockWriteGuard<'_, InMemoryTaskState>> {
        self.state.write().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn insert(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.write_state()?;
        if state.tasks.contains_key(&task.id()) {
            return Err(TaskRepositoryError::DuplicateTask(task.id()));
        }
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn find_by_id(&self, owner: &OwnerId, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let state = self.read_state()?;
        Ok(state
            .tasks
            .get(&id)
            .filter(|task| task.owner() == owner)
            .cloned())
    }

    async fn list_active(&self, owner: &OwnerId) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.read_state()?;
        Ok(select_sorted(
            &state,
            owner,
            |task| task.state() == TaskState::Active,
            Task::position,
        ))
    }

    async fn list_completed(&self, owner: &OwnerId) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.read_state()?;
        Ok(select_sorted(
            &state,
            owner,
            |task| task.state() == TaskState::Completed,
            Task::completed_at,
        ))
    }

    async fn list_archived(&self, owner: &OwnerId) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.read_state()?;
        Ok(select_sorted(
            &state,
            owner,
            Task::is_archived,
            Task::archived_at,
        ))
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.write_state()?;
        let owned = state
            .tasks
            .get(&task.id())
            .is_some_and(|existing| existing.owner() == task.owner());
        if !owned {
            return Err(TaskRepositoryError::NotFound(task.id()));
        }
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn update_positions(
        &self,
        owner: &OwnerId,
        assignments: &[PositionAssignment],
    ) -> TaskRepositoryResult<()> {
        let mut state = self.write_state()?;
        // Verify the whole batch before touching anything: a missing row
        // must abort the rewrite with no assignment applied.
        for assignment in assignments {
            let owned = state
                .tasks
                .get(&assignment.id)
                .is_some_and(|task| task.owner() == owner);
            if !owned {
                return Err(TaskRepositoryError::NotFound(assignment.id));
            }
        }
        for assignment in assignments {
            let updated = state
                .tasks
                .get(&assignment.id)
                .map(|task| with_position(task, assignment.position));
            if let Some(task) = updated {
                state.tasks.insert(assignment.id, task);
            }
        }
        Ok(())
    }

    async fn delete(&self, owner: &OwnerId, id: TaskId) -> TaskRepositoryResult<()> {
        let mut state = self.write_state()?;
        let owned = state
            .tasks
            .get(&id)
            .is_some_and(|task| task.owner() == owner);
        if !owned {
            return Err(TaskRepositoryError::NotFound(id));
        }
        state.tasks.remove(&id);
        Ok(())
    }

    async fn archive_completed(
        &self,
        owner: &OwnerId,
        archived_at: DateTime<Utc>,
    ) -> TaskRepositoryResult<usize> {
        let mut state = self.write_state()?;
        let ids: Vec<TaskId> = state
            .tasks
            .values()
            .filter(|task| task.owner() == owner && task.state() == TaskState::Completed)
            .map(Task::id)
            .collect();
        for id in &ids {
            let updated = state
                .tasks
                .get(id)
                .map(|task| archived_copy(task, archived_at));
            if let Some(task) = updated {
                state.tasks.insert(*id, task);
            }
        }
        Ok(ids.len())
    }

    async fn delete_archived(&self, owner: &OwnerId) -> TaskRepositoryResult<usize> {
        let mut state = self.write_state()?;
        let before = state.tasks.len();
        state
            .tasks
            .retain(|_, task| !(task.owner() == owner && task.is_archived()));
        Ok(before - state.tasks.len())
    }
}
