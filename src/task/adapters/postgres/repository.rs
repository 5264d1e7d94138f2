//! `PostgreSQL` repository implementation for the authoritative task store.

use super::{
    models::{NewTaskRow, TaskChangeset, TaskRow},
    schema::tasks,
};
use crate::task::{
    domain::{
        OwnerId, PersistedTaskData, PositionAssignment, QueuePosition, Task, TaskId, TaskText,
    },
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by task adapters.
pub type TaskPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed task repository.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: TaskPgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskRepositoryError::persistence)?
    }
}

impl From<DieselError> for TaskRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn insert(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let new_row = to_new_row(task)?;

        self.run_blocking(move |connection| {
            diesel::insert_into(tasks::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        TaskRepositoryError::DuplicateTask(task_id)
                    }
                    _ => TaskRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, owner: &OwnerId, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let owner_key = owner.as_str().to_owned();
        self.run_blocking(move |connection| {
            let row = tasks::table
                .filter(tasks::id.eq(id.into_inner()))
                .filter(tasks::owner_id.eq(owner_key))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn list_active(&self, owner: &OwnerId) -> TaskRepositoryResult<Vec<Task>> {
        let owner_key = owner.as_str().to_owned();
        self.run_blocking(move |connection| {
            let rows = tasks::table
                .filter(tasks::owner_id.eq(owner_key))
                .filter(tasks::completed.eq(false))
                .order(tasks::position.asc())
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn list_completed(&self, owner: &OwnerId) -> TaskRepositoryResult<Vec<Task>> {
        let owner_key = owner.as_str().to_owned();
        self.run_blocking(move |connection| {
            let rows = tasks::table
                .filter(tasks::owner_id.eq(owner_key))
                .filter(tasks::completed.eq(true))
                .filter(tasks::archived.eq(false))
                .order(tasks::completed_at.asc())
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn list_archived(&self, owner: &OwnerId) -> TaskRepositoryResult<Vec<Task>> {
        let owner_key = owner.as_str().to_owned();
        self.run_blocking(move |connection| {
            let rows = tasks::table
                .filter(tasks::owner_id.eq(owner_key))
                .filter(tasks::archived.eq(true))
                .order(tasks::archived_at.asc())
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let owner_key = task.owner().as_str().to_owned();
        let changeset = to_changeset(task)?;

        self.run_blocking(move |connection| {
            let updated = diesel::update(
                tasks::table
                    .filter(tasks::id.eq(task_id.into_inner()))
                    .filter(tasks::owner_id.eq(owner_key)),
            )
            .set(&changeset)
            .execute(connection)
            .map_err(TaskRepositoryError::persistence)?;
            if updated == 0 {
                return Err(TaskRepositoryError::NotFound(task_id));
            }
            Ok(())
        })
        .await
    }

    async fn update_positions(
        &self,
        owner: &OwnerId,
        assignments: &[PositionAssignment],
    ) -> TaskRepositoryResult<()> {
        let owner_key = owner.as_str().to_owned();
        let writes = assignments
            .iter()
            .map(|assignment| {
                Ok((
                    assignment.id,
                    to_persisted_position(assignment.position)?,
                ))
            })
            .collect::<TaskRepositoryResult<Vec<(TaskId, i32)>>>()?;

        self.run_blocking(move |connection| {
            // One transaction for the whole rewrite: a crash or missing row
            // mid-batch must not leave the active positions non-dense.
            connection.transaction(|inner| {
                for (row_id, row_position) in &writes {
                    let updated = diesel::update(
                        tasks::table
                            .filter(tasks::id.eq(row_id.into_inner()))
                            .filter(tasks::owner_id.eq(&owner_key)),
                    )
                    .set(tasks::position.eq(*row_position))
                    .execute(inner)?;
                    if updated == 0 {
                        return Err(TaskRepositoryError::NotFound(*row_id));
                    }
                }
                Ok(())
            })
        })
        .await
    }

    async fn delete(&self, owner: &OwnerId, id: TaskId) -> TaskRepositoryResult<()> {
        let owner_key = owner.as_str().to_owned();
        self.run_blocking(move |connection| {
            let deleted = diesel::delete(
                tasks::table
                    .filter(tasks::id.eq(id.into_inner()))
                    .filter(tasks::owner_id.eq(owner_key)),
            )
            .execute(connection)
            .map_err(TaskRepositoryError::persistence)?;
            if deleted == 0 {
                return Err(TaskRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn archive_completed(
        &self,
        owner: &OwnerId,
        archived_at: DateTime<Utc>,
    ) -> TaskRepositoryResult<usize> {
        let owner_key = owner.as_str().to_owned();
        self.run_blocking(move |connection| {
            let archived = diesel::update(
                tasks::table
                    .filter(tasks::owner_id.eq(owner_key))
                    .filter(tasks::completed.eq(true))
                    .filter(tasks::archived.eq(false)),
            )
            .set((
                tasks::archived.eq(true),
                tasks::archived_at.eq(Some(archived_at)),
            ))
            .execute(connection)
            .map_err(TaskRepositoryError::persistence)?;
            Ok(archived)
        })
        .await
    }

    async fn delete_archived(&self, owner: &OwnerId) -> TaskRepositoryResult<usize> {
        let owner_key = owner.as_str().to_owned();
        self.run_blocking(move |connection| {
            let deleted = diesel::delete(
                tasks::table
                    .filter(tasks::owner_id.eq(owner_key))
                    .filter(tasks::archived.eq(true)),
            )
            .execute(connection)
            .map_err(TaskRepositoryError::persistence)?;
            Ok(deleted)
        })
        .await
    }
}

/// Converts a queue position to its `Int4` storage form.
fn to_persisted_position(position: QueuePosition) -> TaskRepositoryResult<i32> {
    i32::try_from(position.value()).map_err(TaskRepositoryError::persistence)
}

fn to_new_row(task: &Task) -> TaskRepositoryResult<NewTaskRow> {
    Ok(NewTaskRow {
        id: task.id().into_inner(),
        owner_id: task.owner().as_str().to_owned(),
        text: task.text().as_str().to_owned(),
        position: to_persisted_position(task.position())?,
        completed: task.is_completed(),
        completed_at: task.completed_at(),
        archived: task.is_archived(),
        archived_at: task.archived_at(),
        created_at: task.created_at(),
    })
}

fn to_changeset(task: &Task) -> TaskRepositoryResult<TaskChangeset> {
    Ok(TaskChangeset {
        position: to_persisted_position(task.position())?,
        completed: task.is_completed(),
        completed_at: task.completed_at(),
        archived: task.is_archived(),
        archived_at: task.archived_at(),
    })
}

fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let TaskRow {
        id,
        owner_id,
        text: raw_text,
        position: raw_position,
        completed,
        completed_at,
        archived,
        archived_at,
        created_at,
    } = row;

    let owner = OwnerId::new(owner_id).map_err(TaskRepositoryError::persistence)?;
    let text = TaskText::new(raw_text).map_err(TaskRepositoryError::persistence)?;
    let position_value = u32::try_from(raw_position).map_err(TaskRepositoryError::persistence)?;
    let position = QueuePosition::new(position_value).map_err(TaskRepositoryError::persistence)?;

    let data = PersistedTaskData {
        id: TaskId::from_uuid(id),
        owner,
        text,
        position,
        completed,
        completed_at,
        archived,
        archived_at,
        created_at,
    };
    Ok(Task::from_persisted(data))
}
