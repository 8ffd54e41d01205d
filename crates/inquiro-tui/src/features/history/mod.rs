//! Paginated history browsing and mutations.

mod render;
mod state;
pub mod update;

pub use render::{HistoryView, render_history};
pub use state::{HistoryState, PageDirection};
