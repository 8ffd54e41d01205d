//! Effect handlers for the session runtime.
//!
//! Handlers are pure async functions that call the transport and wrap the
//! outcome in a `SessionEvent`. The runtime spawns them and routes the
//! result to the inbox; they never touch `AppState`.

use std::sync::Arc;
use std::time::Duration;

use inquiro_core::chat::HistoryId;
use inquiro_core::transport::Transport;
use tokio_util::sync::CancellationToken;

use crate::events::{HistoryEvent, SearchEvent, SessionEvent, TranscriptEvent};

pub async fn send_chat<T: Transport>(transport: Arc<T>, message: String, epoch: u64) -> SessionEvent {
    let result = transport.send_chat(&message).await;
    SessionEvent::Transcript(TranscriptEvent::ReplyReceived { epoch, result })
}

pub async fn load_history_page<T: Transport>(
    transport: Arc<T>,
    page: u32,
    page_size: u32,
) -> SessionEvent {
    let result = transport.list_history(page, page_size).await;
    SessionEvent::History(HistoryEvent::PageLoaded { result })
}

pub async fn delete_history<T: Transport>(transport: Arc<T>, id: HistoryId) -> SessionEvent {
    let result = transport.delete_history(&id).await;
    SessionEvent::History(HistoryEvent::Deleted { id, result })
}

pub async fn clear_history<T: Transport>(transport: Arc<T>) -> SessionEvent {
    let result = transport.clear_history().await;
    SessionEvent::History(HistoryEvent::Cleared { result })
}

pub async fn search_history<T: Transport>(
    transport: Arc<T>,
    query: String,
    page_size: u32,
) -> SessionEvent {
    let result = transport.search_history(&query, 1, page_size).await;
    SessionEvent::Search(SearchEvent::ResultsReceived { query, result })
}

/// Waits out the debounce interval. `None` when cancelled first.
pub async fn debounce(generation: u64, delay: Duration, cancel: CancellationToken) -> Option<SessionEvent> {
    tokio::select! {
        () = cancel.cancelled() => None,
        () = tokio::time::sleep(delay) => {
            Some(SessionEvent::Search(SearchEvent::DebounceElapsed { generation }))
        }
    }
}
