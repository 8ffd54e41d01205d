use inquiro_core::chat::HistoryEntry;
use tokio_util::sync::CancellationToken;

use crate::common::{TaskId, TaskState};

/// Which list the history panel shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Browsing,
    Searching,
}

#[derive(Debug)]
pub(crate) struct PendingDebounce {
    pub(crate) generation: u64,
    pub(crate) cancel: CancellationToken,
}

/// Search unit state.
///
/// `request.active` is the id of the most recently issued search; only a
/// response carrying that id may touch `results`.
#[derive(Debug, Default)]
pub struct SearchState {
    pub(crate) query_text: String,
    pub request: TaskState,
    pub(crate) results: Vec<HistoryEntry>,
    pub(crate) is_searching: bool,
    pub(crate) debounce: Option<PendingDebounce>,
    pub(crate) debounce_generation: u64,
}

impl SearchState {
    pub fn query_text(&self) -> &str {
        &self.query_text
    }

    pub fn results(&self) -> &[HistoryEntry] {
        &self.results
    }

    pub fn is_searching(&self) -> bool {
        self.is_searching
    }

    pub fn pending_request_id(&self) -> Option<TaskId> {
        self.request.active
    }

    pub fn has_pending_debounce(&self) -> bool {
        self.debounce.is_some()
    }

    /// Searching iff the trimmed query is non-empty.
    pub fn view_mode(&self) -> ViewMode {
        if self.query_text.trim().is_empty() {
            ViewMode::Browsing
        } else {
            ViewMode::Searching
        }
    }
}
