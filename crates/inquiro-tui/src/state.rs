//! Controller state.
//!
//! `AppState` is owned by the runtime and mutated only by the reducer in
//! `update.rs`. Views read it through `visible_entries` / `snapshot`.

use std::time::Duration;

use inquiro_core::chat::{HistoryEntry, Message};
use inquiro_core::config::Config;

use crate::common::{TaskId, TaskKind, TaskSeq, TaskState};
use crate::features::history::HistoryState;
use crate::features::search::{SearchState, ViewMode};
use crate::features::transcript::TranscriptState;

/// Tunables read from config.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub history_page_size: u32,
    pub search_page_size: u32,
    pub debounce: Duration,
}

impl SessionSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            history_page_size: config.history.page_size.max(1),
            search_page_size: config.search.page_size.max(1),
            debounce: config.search.debounce(),
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

#[derive(Debug, Default)]
pub struct AppState {
    pub transcript: TranscriptState,
    pub history: HistoryState,
    pub search: SearchState,
    pub task_seq: TaskSeq,
    pub settings: SessionSettings,
    /// Set once the backend answers 401. The credentials are already gone;
    /// the UI is expected to leave.
    pub session_expired: bool,
    /// Task whose 401 ended the session.
    pub expired_by: Option<TaskId>,
}

impl AppState {
    pub fn new(settings: SessionSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn view_mode(&self) -> ViewMode {
        self.search.view_mode()
    }

    /// The list the history panel shows: search results while searching,
    /// the current browse page otherwise.
    pub fn visible_entries(&self) -> &[HistoryEntry] {
        match self.view_mode() {
            ViewMode::Searching => self.search.results(),
            ViewMode::Browsing => self.history.entries(),
        }
    }

    pub fn task_state_mut(&mut self, kind: TaskKind) -> &mut TaskState {
        match kind {
            TaskKind::Send => &mut self.transcript.send,
            TaskKind::HistoryLoad => &mut self.history.load,
            TaskKind::HistoryDelete | TaskKind::HistoryClear => &mut self.history.mutations,
            TaskKind::Search => &mut self.search.request,
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            transcript: self.transcript.messages().to_vec(),
            view_mode: self.view_mode(),
            entries: self.visible_entries().to_vec(),
            results: self.search.results().to_vec(),
            page_items: self.history.entries().to_vec(),
            query_text: self.search.query_text().to_string(),
            is_searching: self.search.is_searching(),
            pending_request_id: self.search.pending_request_id(),
            is_sending: self.transcript.is_sending(),
            queued: self.transcript.queued_len(),
            page_number: self.history.page_number(),
            total_pages: self.history.total_pages(),
            session_expired: self.session_expired,
        }
    }
}

/// Owned copy of everything a view needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub transcript: Vec<Message>,
    pub view_mode: ViewMode,
    /// What the history panel shows for `view_mode`.
    pub entries: Vec<HistoryEntry>,
    /// Latest applied search results.
    pub results: Vec<HistoryEntry>,
    /// Current browse page, kept while searching.
    pub page_items: Vec<HistoryEntry>,
    pub query_text: String,
    pub is_searching: bool,
    pub pending_request_id: Option<TaskId>,
    pub is_sending: bool,
    /// Prompts waiting for the in-flight send.
    pub queued: usize,
    pub page_number: u32,
    pub total_pages: u32,
    pub session_expired: bool,
}
