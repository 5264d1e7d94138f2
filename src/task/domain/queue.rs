//! Pure position planning for the active queue.
//!
//! The backing stores have no list-splice primitive, so every reordering is
//! expressed as an explicit set of position writes applied atomically by the
//! repository. Plans are computed over a snapshot of the owner's active
//! tasks and keep positions dense: after any plan settles, the owner's
//! active positions form the contiguous sequence `0..N-1`.

use super::{QueuePosition, TaskDomainError, TaskId};
use std::collections::HashSet;

/// A single position write produced by a queue plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionAssignment {
    /// Task receiving the new position.
    pub id: TaskId,
    /// Position assigned to the task.
    pub position: QueuePosition,
}

/// Converts a zero-based rank into a queue position.
///
/// Also serves as the append position for create and restore: a task joining
/// the queue takes the rank equal to the current active count.
///
/// # Errors
///
/// Returns [`TaskDomainError::PositionOutOfRange`] when the rank exceeds the
/// persistable range.
pub fn position_at(rank: usize) -> Result<QueuePosition, TaskDomainError> {
    let value = u32::try_from(rank).map_err(|_| capacity_error(rank))?;
    QueuePosition::new(value)
}

/// Plans the position writes that restore density after a removal.
///
/// Tasks are ranked by their current position; only rows whose position
/// differs from its rank are emitted, so a second consecutive compaction
/// plans no writes at all.
///
/// # Errors
///
/// Returns [`TaskDomainError::PositionOutOfRange`] when the queue exceeds
/// the persistable position range.
pub fn compaction_plan(
    active: &[(TaskId, QueuePosition)],
) -> Result<Vec<PositionAssignment>, TaskDomainError> {
    let mut plan = Vec::new();
    for (rank, (id, position)) in by_position(active).into_iter().enumerate() {
        let target = position_at(rank)?;
        if position != target {
            plan.push(PositionAssignment {
                id,
                position: target,
            });
        }
    }
    Ok(plan)
}

/// Plans the skip rotation: the front task moves behind the current maximum
/// and every other task shifts down by one.
///
/// Every row is written explicitly. Returns an empty plan when fewer than
/// two tasks are active.
///
/// # Errors
///
/// Returns [`TaskDomainError::PositionOutOfRange`] when the queue exceeds
/// the persistable position range.
pub fn rotation_plan(
    active: &[(TaskId, QueuePosition)],
) -> Result<Vec<PositionAssignment>, TaskDomainError> {
    if active.len() < 2 {
        return Ok(Vec::new());
    }
    let ordered = by_position(active);
    let Some(((front, _), rest)) = ordered.split_first() else {
        return Ok(Vec::new());
    };
    let mut plan = Vec::with_capacity(ordered.len());
    for (rank, (id, _)) in rest.iter().enumerate() {
        plan.push(PositionAssignment {
            id: *id,
            position: position_at(rank)?,
        });
    }
    plan.push(PositionAssignment {
        id: *front,
        position: position_at(rest.len())?,
    });
    Ok(plan)
}

/// Plans a caller-supplied full reorder: position = index for each id.
///
/// # Errors
///
/// Returns [`TaskDomainError::QueueMismatch`] unless the id list is an exact
/// permutation of the active set, or
/// [`TaskDomainError::PositionOutOfRange`] when the queue exceeds the
/// persistable position range.
pub fn reorder_plan(
    active: &[(TaskId, QueuePosition)],
    desired: &[TaskId],
) -> Result<Vec<PositionAssignment>, TaskDomainError> {
    if desired.len() != active.len() {
        return Err(TaskDomainError::QueueMismatch);
    }
    let current: HashSet<TaskId> = active.iter().map(|(id, _)| *id).collect();
    let mut seen = HashSet::with_capacity(desired.len());
    for id in desired {
        if !current.contains(id) || !seen.insert(*id) {
            return Err(TaskDomainError::QueueMismatch);
        }
    }
    desired
        .iter()
        .enumerate()
        .map(|(rank, id)| {
            Ok(PositionAssignment {
                id: *id,
                position: position_at(rank)?,
            })
        })
        .collect()
}

/// Orders a queue snapshot by current position ascending.
fn by_position(active: &[(TaskId, QueuePosition)]) -> Vec<(TaskId, QueuePosition)> {
    let mut ordered = active.to_vec();
    ordered.sort_by_key(|(_, position)| *position);
    ordered
}

/// Maps an unrepresentable rank to the domain capacity error.
fn capacity_error(rank: usize) -> TaskDomainError {
    TaskDomainError::PositionOutOfRange(u64::try_from(rank).unwrap_or(u64::MAX))
}
