//! Shared helpers used across feature slices.

mod task;
pub mod text;

pub use task::{Completion, TaskCompleted, TaskId, TaskKind, TaskSeq, TaskState};
