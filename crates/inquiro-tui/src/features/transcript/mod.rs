//! Conversation transcript: ordered messages plus the outgoing send queue.

mod markdown;
mod render;
mod state;
pub mod update;

pub use markdown::render_markdown;
pub use render::{render_transcript, transcript_lines};
pub use state::TranscriptState;
