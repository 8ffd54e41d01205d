//! Session event types.
//!
//! Everything the reducer reacts to arrives as a `SessionEvent`: user intents
//! from the UI, debounce timer expiry, and transport results wrapped in a
//! `TaskCompleted` envelope so the reducer can drop stale ones.

use inquiro_core::chat::{ChatReply, HistoryEntry, HistoryId, Page};
use inquiro_core::transport::TransportResult;

use crate::common::{TaskCompleted, TaskId, TaskKind};
use crate::features::history::PageDirection;

#[derive(Debug)]
pub enum SessionEvent {
    /// A user intent.
    Action(SessionAction),

    /// A spawned request finished. The inner event is only applied if the
    /// task is accepted by its `TaskState`.
    TaskCompleted {
        kind: TaskKind,
        completed: TaskCompleted<Box<SessionEvent>>,
    },

    Transcript(TranscriptEvent),
    History(HistoryEvent),
    Search(SearchEvent),
}

impl SessionEvent {
    pub fn completed(kind: TaskKind, id: TaskId, result: SessionEvent) -> Self {
        SessionEvent::TaskCompleted {
            kind,
            completed: TaskCompleted {
                id,
                result: Box::new(result),
            },
        }
    }
}

/// User intents accepted by the controller.
#[derive(Debug, Clone)]
pub enum SessionAction {
    Send { text: String },
    QueryChanged { text: String },
    SelectHistory { entry: HistoryEntry },
    DeleteHistory { id: HistoryId },
    ClearHistory,
    PageChange { direction: PageDirection },
    NewConversation,
    /// Reload the current browse page (and the active search, if any).
    Refresh,
}

#[derive(Debug)]
pub enum TranscriptEvent {
    ReplyReceived {
        epoch: u64,
        result: TransportResult<ChatReply>,
    },
}

#[derive(Debug)]
pub enum HistoryEvent {
    PageLoaded { result: TransportResult<Page> },
    Deleted {
        id: HistoryId,
        result: TransportResult<()>,
    },
    Cleared { result: TransportResult<()> },
}

#[derive(Debug)]
pub enum SearchEvent {
    DebounceElapsed { generation: u64 },
    ResultsReceived {
        query: String,
        result: TransportResult<Vec<HistoryEntry>>,
    },
}
