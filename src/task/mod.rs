//! Task lifecycle and ordering engine.
//!
//! Implements the per-owner focus queue: tasks are created into a densely
//! positioned active queue, processed front-first with a "skip" rotation
//! that defers the current task to the back, completed into a per-day
//! completion log, soft-deleted into a recoverable bin, and finally purged.
//! The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
