use inquiro_core::chat::{HistoryEntry, Page};

use crate::common::TaskState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageDirection {
    Previous,
    Next,
}

/// Cached copy of the browse list.
///
/// The page is replaced wholesale on every successful fetch and never
/// patched locally.
#[derive(Debug, Default)]
pub struct HistoryState {
    page: Page,
    /// Page of the most recent load still in flight.
    requested_page: Option<u32>,
    /// Page fetches (latest wins).
    pub load: TaskState,
    /// Delete and clear requests.
    pub mutations: TaskState,
}

impl HistoryState {
    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.page.items
    }

    pub fn page_number(&self) -> u32 {
        self.page.page_number
    }

    /// The page the list is heading to: the in-flight load's page, or the
    /// loaded page when nothing is pending.
    pub fn target_page(&self) -> u32 {
        self.requested_page.unwrap_or(self.page.page_number)
    }

    pub fn total_pages(&self) -> u32 {
        self.page.total_pages
    }

    pub fn is_loading(&self) -> bool {
        self.load.is_running()
    }

    pub fn is_mutating(&self) -> bool {
        self.mutations.is_running()
    }

    pub(crate) fn replace_page(&mut self, page: Page) {
        self.page = page;
        self.requested_page = None;
    }

    pub(crate) fn set_requested_page(&mut self, page: Option<u32>) {
        self.requested_page = page;
    }
}
