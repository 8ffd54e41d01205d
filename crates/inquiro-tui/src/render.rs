//! Frame layout.
//!
//! Transcript on the left with the prompt below it; search box and history
//! list on the right; one status row at the bottom.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::{Focus, ViewState};
use crate::features::history::{HistoryView, render_history};
use crate::features::input::render_input;
use crate::features::transcript::render_transcript;
use crate::state::AppState;

pub fn render(state: &AppState, view: &ViewState, frame: &mut Frame) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(frame.area());
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(64), Constraint::Percentage(36)])
        .split(rows[0]);
    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(3)])
        .split(columns[0]);
    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)])
        .split(columns[1]);

    render_transcript(frame, left[0], &state.transcript, view.transcript_scroll);
    render_input(
        frame,
        left[1],
        &view.prompt,
        "Message",
        "Type a message and press Enter",
        view.focus == Focus::Prompt,
    );
    render_input(
        frame,
        right[0],
        &view.query,
        "Search",
        "Search history…",
        view.focus == Focus::History,
    );

    let entries = state.visible_entries();
    let selected = (!entries.is_empty() && view.focus == Focus::History)
        .then(|| view.selected.min(entries.len() - 1));
    render_history(
        frame,
        right[1],
        &HistoryView {
            entries,
            mode: state.view_mode(),
            page_number: state.history.page_number(),
            total_pages: state.history.total_pages(),
            busy: state.search.is_searching() || state.history.is_loading(),
            selected,
            focused: view.focus == Focus::History,
            confirm_clear: view.confirm_clear,
        },
    );

    frame.render_widget(Paragraph::new(status_line(state, view)), rows[1]);
}

fn status_line(state: &AppState, view: &ViewState) -> Line<'static> {
    let hint = Style::default().fg(Color::DarkGray);
    let hints = match view.focus {
        Focus::Prompt => "Enter send · Tab history · Ctrl+N new · Ctrl+C quit",
        Focus::History => {
            "Enter open · ↑↓ select · PgUp/PgDn page · Ctrl+D delete · Ctrl+X clear · Esc reset"
        }
    };
    let mut spans = Vec::new();
    if state.transcript.is_sending() {
        spans.push(Span::styled("sending… ", Style::default().fg(Color::Yellow)));
    }
    if state.history.is_mutating() {
        spans.push(Span::styled("updating… ", Style::default().fg(Color::Yellow)));
    }
    spans.push(Span::styled(hints, hint));
    Line::from(spans)
}
