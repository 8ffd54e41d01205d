use std::collections::VecDeque;

use inquiro_core::chat::{HistoryEntry, Message};

use crate::common::TaskState;

/// Messages of the current conversation, oldest first.
///
/// Append-only except for wholesale `replace_with_entry` / `clear`. Both
/// bump `epoch` so replies issued against the old conversation are dropped.
#[derive(Debug, Default)]
pub struct TranscriptState {
    messages: Vec<Message>,
    epoch: u64,
    /// Outgoing chat requests. Sends are serialized, one in flight at a time.
    pub send: TaskState,
    /// Prompts waiting for the in-flight send, with the epoch they were typed in.
    queued: VecDeque<(String, u64)>,
}

impl TranscriptState {
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn is_sending(&self) -> bool {
        self.send.is_running()
    }

    pub fn queued_len(&self) -> usize {
        self.queued.len()
    }

    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Replaces the conversation with a past exchange.
    pub fn replace_with_entry(&mut self, entry: &HistoryEntry) {
        self.messages = entry.as_transcript().to_vec();
        self.bump_epoch();
    }

    /// Starts a fresh conversation. Queued prompts are discarded too.
    pub fn clear(&mut self) {
        self.messages.clear();
        self.queued.clear();
        self.bump_epoch();
    }

    pub(crate) fn enqueue(&mut self, text: String) {
        self.queued.push_back((text, self.epoch));
    }

    pub(crate) fn dequeue(&mut self) -> Option<(String, u64)> {
        self.queued.pop_front()
    }

    fn bump_epoch(&mut self) {
        self.epoch = self.epoch.wrapping_add(1);
    }
}
