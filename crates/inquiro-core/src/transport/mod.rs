//! Transport client contract and its HTTP implementation.
//!
//! All calls are request/response. Any of them may fail with a
//! [`TransportError`]; a 401 surfaces as [`TransportErrorKind::Unauthorized`]
//! after the credential store has been cleared.

mod error;
mod http;

use std::future::Future;

pub use error::{TransportError, TransportErrorKind, TransportResult};
pub use http::{HttpTransport, USER_AGENT};

use crate::chat::{ChatReply, HistoryEntry, HistoryId, Page};

/// Operations the session controller consumes from the backend.
pub trait Transport: Send + Sync + 'static {
    /// Sends one chat message and returns the assistant reply.
    fn send_chat(&self, message: &str) -> impl Future<Output = TransportResult<ChatReply>> + Send;

    /// Loads one page of the browse list.
    fn list_history(
        &self,
        page: u32,
        page_size: u32,
    ) -> impl Future<Output = TransportResult<Page>> + Send;

    /// Searches past exchanges by free text.
    fn search_history(
        &self,
        query: &str,
        page: u32,
        page_size: u32,
    ) -> impl Future<Output = TransportResult<Vec<HistoryEntry>>> + Send;

    fn delete_history(&self, id: &HistoryId) -> impl Future<Output = TransportResult<()>> + Send;

    fn clear_history(&self) -> impl Future<Output = TransportResult<()>> + Send;
}
