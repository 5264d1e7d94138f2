//! Read-only projection of tasks completed on the current day.

use super::TaskLifecycleResult;
use crate::task::{
    domain::{OwnerId, Task},
    ports::TaskRepository,
};
use chrono::{Local, NaiveDate};
use mockable::Clock;
use std::sync::Arc;

/// Derives the "completed today" view from completion timestamps.
///
/// Purely derived state: the projection is recomputed on every read and
/// never cached across the day boundary.
#[derive(Clone)]
pub struct DailyCompletionsService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> DailyCompletionsService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new daily completions service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Returns the owner's tasks whose completion falls on the viewer's
    /// current calendar date, ordered by completion time.
    ///
    /// Archived tasks are included when `include_archived` is set. The
    /// comparison truncates to the local calendar date; time of day is
    /// ignored.
    ///
    /// # Errors
    ///
    /// Returns [`super::TaskLifecycleError::Repository`] when a lookup
    /// fails.
    pub async fn completed_today(
        &self,
        owner: &OwnerId,
        include_archived: bool,
    ) -> TaskLifecycleResult<Vec<Task>> {
        let today = self.clock.local().date_naive();
        let mut tasks = self.repository.list_completed(owner).await?;
        if include_archived {
            tasks.extend(self.repository.list_archived(owner).await?);
        }
        tasks.retain(|task| completed_on(task, today));
        tasks.sort_by_key(Task::completed_at);
        Ok(tasks)
    }
}

/// Returns whether the task's completion timestamp falls on `date` in the
/// viewer's local calendar.
fn completed_on(task: &Task, date: NaiveDate) -> bool {
    task.completed_at()
        .is_some_and(|at| at.with_timezone(&Local).date_naive() == date)
}
