//! Diesel row models for task persistence.

use super::schema::tasks;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Owning user identifier.
    pub owner_id: String,
    /// User-supplied task text.
    pub text: String,
    /// Queue position among the owner's active rows.
    pub position: i32,
    /// Completion flag.
    pub completed: bool,
    /// Completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
    /// Soft-delete flag.
    pub archived: bool,
    /// Soft-delete timestamp.
    pub archived_at: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Update model for task transitions.
///
/// `None` timestamps write SQL `NULL` so a restore clears the paired
/// columns instead of leaving them untouched.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = tasks)]
#[diesel(treat_none_as_null = true)]
pub struct TaskChangeset {
    /// Queue position among the owner's active rows.
    pub position: i32,
    /// Completion flag.
    pub completed: bool,
    /// Completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
    /// Soft-delete flag.
    pub archived: bool,
    /// Soft-delete timestamp.
    pub archived_at: Option<DateTime<Utc>>,
}

/// Insert model for task records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Owning user identifier.
    pub owner_id: String,
    /// User-supplied task text.
    pub text: String,
    /// Queue position among the owner's active rows.
    pub position: i32,
    /// Completion flag.
    pub completed: bool,
    /// Completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
    /// Soft-delete flag.
    pub archived: bool,
    /// Soft-delete timestamp.
    pub archived_at: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}
