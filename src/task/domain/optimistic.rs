//! Optimistic command model for the client-held queue copy.
//!
//! The client applies each intent to its local order immediately and settles
//! it later against the authoritative store: acknowledged commands fold into
//! the confirmed order, rejected commands are dropped and the remaining
//! pending commands replay over the unchanged base. The two copies share the
//! same transition semantics but are never live-synchronized.

use super::TaskId;
use std::collections::{HashSet, VecDeque};

/// An intent issued against the client-held copy of the active queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueCommand {
    /// Append a newly created task at the back.
    Append(TaskId),
    /// Mark the front task done and drop it from the queue.
    CompleteFront,
    /// Defer the front task to the back.
    Skip,
    /// Remove a task wherever it sits.
    Remove(TaskId),
    /// Replace the queue order wholesale.
    Reorder(Vec<TaskId>),
}

impl QueueCommand {
    /// Applies the command to an ordered id list.
    ///
    /// Application is total: impossible commands degrade to the no-ops the
    /// live client exhibits (skip with fewer than two tasks, removal of an
    /// absent id, completion of an empty queue, reorder with a stale id
    /// set).
    pub fn apply(&self, order: &mut Vec<TaskId>) {
        match self {
            Self::Append(id) => {
                if !order.contains(id) {
                    order.push(*id);
                }
            }
            Self::CompleteFront => {
                if !order.is_empty() {
                    order.remove(0);
                }
            }
            Self::Skip => {
                if order.len() >= 2 {
                    order.rotate_left(1);
                }
            }
            Self::Remove(id) => order.retain(|existing| existing != id),
            Self::Reorder(desired) => {
                if is_permutation(order, desired) {
                    order.clone_from(desired);
                }
            }
        }
    }
}

/// Client-held view of one owner's active queue: the last order the
/// authoritative store acknowledged, plus locally applied pending commands
/// in issue order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptimisticQueue {
    confirmed: Vec<TaskId>,
    pending: VecDeque<QueueCommand>,
}

impl OptimisticQueue {
    /// Creates a queue over the given confirmed order.
    #[must_use]
    pub const fn new(confirmed: Vec<TaskId>) -> Self {
        Self {
            confirmed,
            pending: VecDeque::new(),
        }
    }

    /// Returns the optimistic order: pending commands replayed over the
    /// confirmed base.
    #[must_use]
    pub fn view(&self) -> Vec<TaskId> {
        let mut order = self.confirmed.clone();
        for command in &self.pending {
            command.apply(&mut order);
        }
        order
    }

    /// Records an intent and applies it to the local view.
    pub fn issue(&mut self, command: QueueCommand) {
        self.pending.push_back(command);
    }

    /// Settles the oldest pending command as accepted by the authoritative
    /// store, folding it into the confirmed order.
    pub fn acknowledge(&mut self) -> Option<QueueCommand> {
        let command = self.pending.pop_front()?;
        command.apply(&mut self.confirmed);
        Some(command)
    }

    /// Settles the oldest pending command as rejected, rolling its local
    /// effect back. Later pending commands replay over the unchanged base.
    pub fn reject(&mut self) -> Option<QueueCommand> {
        self.pending.pop_front()
    }

    /// Replaces the confirmed order with a fresh authoritative snapshot.
    ///
    /// Pending commands are kept and replay over the new base.
    pub fn resync(&mut self, confirmed: Vec<TaskId>) {
        self.confirmed = confirmed;
    }

    /// Returns the number of commands awaiting settlement.
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Returns whether every issued command has been settled.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Returns whether `desired` names exactly the ids of `current`, each once.
fn is_permutation(current: &[TaskId], desired: &[TaskId]) -> bool {
    if current.len() != desired.len() {
        return false;
    }
    let existing: HashSet<TaskId> = current.iter().copied().collect();
    let mut seen = HashSet::with_capacity(desired.len());
    desired
        .iter()
        .all(|id| existing.contains(id) && seen.insert(*id))
}
