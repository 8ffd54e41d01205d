//! Transcript reducer: submitting prompts and applying replies.

use inquiro_core::chat::{ChatReply, Message, SEND_FAILURE_TEXT};
use inquiro_core::transport::TransportResult;

use super::TranscriptState;
use crate::common::{Completion, TaskSeq};
use crate::effects::SessionEffect;

/// Submits a prompt.
///
/// Whitespace-only text is ignored. The User message is appended right away;
/// while a send is in flight only the request is queued, and it goes out once
/// the current reply lands.
pub fn submit(
    transcript: &mut TranscriptState,
    seq: &mut TaskSeq,
    text: &str,
) -> Vec<SessionEffect> {
    let text = text.trim();
    if text.is_empty() {
        return vec![];
    }
    transcript.append(Message::user(text));
    if transcript.is_sending() {
        tracing::debug!(queued = transcript.queued_len() + 1, "send in flight, queueing prompt");
        transcript.enqueue(text.to_string());
        return vec![];
    }
    let epoch = transcript.epoch();
    start_send(transcript, seq, text.to_string(), epoch)
}

/// Sends the next queued prompt if nothing is in flight.
pub fn dispatch_queued(transcript: &mut TranscriptState, seq: &mut TaskSeq) -> Vec<SessionEffect> {
    if transcript.is_sending() {
        return vec![];
    }
    match transcript.dequeue() {
        Some((text, epoch)) => start_send(transcript, seq, text, epoch),
        None => vec![],
    }
}

fn start_send(
    transcript: &mut TranscriptState,
    seq: &mut TaskSeq,
    text: String,
    epoch: u64,
) -> Vec<SessionEffect> {
    let task = seq.next_id();
    transcript.send.begin(task);
    vec![SessionEffect::SendChat {
        task,
        message: text,
        epoch,
    }]
}

/// Applies a chat reply.
///
/// The agent message (or the fixed failure text) is appended only when the
/// transcript has not been replaced since the request went out.
pub fn handle_reply(
    transcript: &mut TranscriptState,
    epoch: u64,
    result: TransportResult<ChatReply>,
) -> Completion {
    let current = epoch == transcript.epoch();
    match result {
        Ok(reply) => {
            if current {
                transcript.append(Message::agent(reply.reply));
            } else {
                tracing::debug!("dropping reply for a replaced conversation");
            }
            Completion::Applied
        }
        Err(error) if error.is_unauthorized() => Completion::Expired,
        Err(error) => {
            tracing::warn!(kind = %error.kind, error = %error, "chat request failed");
            if current {
                transcript.append(Message::agent(SEND_FAILURE_TEXT));
            }
            Completion::Failed
        }
    }
}
