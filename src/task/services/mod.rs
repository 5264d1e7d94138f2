//! Application services for task queue orchestration.

mod archive;
mod completions;
mod lifecycle;

pub use archive::ArchiveService;
pub use completions::DailyCompletionsService;
pub use lifecycle::{TaskLifecycleError, TaskLifecycleResult, TaskLifecycleService};
