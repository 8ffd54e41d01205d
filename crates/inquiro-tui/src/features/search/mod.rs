//! Debounced full-text search over history.

mod state;
pub mod update;

pub use state::{SearchState, ViewMode};
