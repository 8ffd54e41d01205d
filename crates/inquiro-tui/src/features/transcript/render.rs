//! Transcript rendering.

use inquiro_core::chat::Role;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use super::{TranscriptState, render_markdown};
use crate::common::text::wrap_line;

/// Builds wrapped transcript lines for `width` columns.
pub fn transcript_lines(transcript: &TranscriptState, width: usize) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    for (idx, message) in transcript.messages().iter().enumerate() {
        if idx > 0 {
            lines.push(Line::default());
        }
        match message.role {
            Role::User => {
                let prefix = Span::styled("│ ", Style::default().fg(Color::Cyan));
                let style = Style::default().add_modifier(Modifier::ITALIC);
                let content_width = width.saturating_sub(2);
                for raw in message.text.lines() {
                    for wrapped in wrap_line(Line::styled(raw.to_string(), style), content_width) {
                        let mut spans = vec![prefix.clone()];
                        spans.extend(wrapped.spans);
                        lines.push(Line::from(spans));
                    }
                }
            }
            Role::Agent => {
                for line in render_markdown(&message.text, Style::default()) {
                    lines.extend(wrap_line(line, width));
                }
            }
        }
    }

    if transcript.is_sending() {
        if !lines.is_empty() {
            lines.push(Line::default());
        }
        let mut status = "Thinking…".to_string();
        if transcript.queued_len() > 0 {
            status.push_str(&format!(" ({} queued)", transcript.queued_len()));
        }
        lines.push(Line::styled(
            status,
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        ));
    }

    lines
}

/// Renders the transcript pane, bottom-anchored.
///
/// `scroll_from_bottom` counts lines scrolled up from the latest message and
/// is clamped to the content height.
pub fn render_transcript(
    frame: &mut Frame,
    area: Rect,
    transcript: &TranscriptState,
    scroll_from_bottom: usize,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Conversation ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if transcript.is_empty() && !transcript.is_sending() {
        let hint = Paragraph::new(Line::styled(
            "Hi! How can I help you today?",
            Style::default().fg(Color::DarkGray),
        ));
        frame.render_widget(hint, inner);
        return;
    }

    let lines = transcript_lines(transcript, inner.width as usize);
    let height = inner.height as usize;
    let max_scroll = lines.len().saturating_sub(height);
    let top = max_scroll - scroll_from_bottom.min(max_scroll);
    let visible: Vec<Line<'static>> = lines.into_iter().skip(top).take(height).collect();
    frame.render_widget(Paragraph::new(visible), inner);
}

#[cfg(test)]
mod tests {
    use inquiro_core::chat::Message;

    use super::*;

    fn plain(lines: &[Line<'_>]) -> Vec<String> {
        lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    #[test]
    fn test_user_lines_are_prefixed() {
        let mut transcript = TranscriptState::default();
        transcript.append(Message::user("Hello"));
        transcript.append(Message::agent("Hi there"));

        let lines = plain(&transcript_lines(&transcript, 40));
        assert_eq!(lines, vec!["│ Hello", "", "Hi there"]);
    }

    #[test]
    fn test_long_user_message_wraps_with_prefix() {
        let mut transcript = TranscriptState::default();
        transcript.append(Message::user("one two three four"));

        let lines = plain(&transcript_lines(&transcript, 11));
        assert_eq!(lines, vec!["│ one two", "│ three", "│ four"]);
    }
}
