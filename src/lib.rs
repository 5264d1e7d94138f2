//! FocusQ: task lifecycle and ordering engine for a single-task focus
//! queue.
//!
//! Users accumulate a backlog of short text tasks and process them one at a
//! time: the front of the queue is the current task, "done" pops it into a
//! per-day completion log, "skip" defers it to the back, and completed
//! tasks can be soft-deleted into a recoverable bin before permanent
//! removal. All state is partitioned by owner and the active queue keeps a
//! dense zero-based position order at all times.
//!
//! # Architecture
//!
//! FocusQ follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, in-memory)
//!
//! Transport bindings, authentication, and UI live outside this crate: an
//! external layer resolves each request to an owner identifier before the
//! services here are invoked.

pub mod task;
