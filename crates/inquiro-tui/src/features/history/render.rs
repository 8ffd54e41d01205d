//! History panel rendering (browse page or search results).

use inquiro_core::chat::HistoryEntry;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

use crate::common::text::{single_line, truncate_with_ellipsis};
use crate::features::search::ViewMode;

/// Everything the panel needs for one frame.
pub struct HistoryView<'a> {
    pub entries: &'a [HistoryEntry],
    pub mode: ViewMode,
    pub page_number: u32,
    pub total_pages: u32,
    pub busy: bool,
    pub selected: Option<usize>,
    pub focused: bool,
    pub confirm_clear: bool,
}

pub fn render_history(frame: &mut Frame, area: Rect, view: &HistoryView<'_>) {
    let border = if view.focused {
        Color::Cyan
    } else {
        Color::DarkGray
    };
    let title = match view.mode {
        ViewMode::Browsing => " History ".to_string(),
        ViewMode::Searching => format!(" Results ({}) ", view.entries.len()),
    };
    let footer = match (view.mode, view.busy) {
        (_, true) => " loading… ".to_string(),
        (ViewMode::Browsing, false) => {
            format!(" Page {}/{} ", view.page_number, view.total_pages)
        }
        (ViewMode::Searching, false) => String::new(),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(title)
        .title_bottom(Line::styled(footer, Style::default().fg(Color::DarkGray)));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if view.confirm_clear {
        let prompt = Paragraph::new(vec![
            Line::styled(
                "Delete all history?",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Line::from("y: confirm   n/Esc: cancel"),
        ]);
        frame.render_widget(prompt, inner);
        return;
    }

    if view.entries.is_empty() {
        let empty = match view.mode {
            ViewMode::Browsing => "No conversations yet.",
            ViewMode::Searching if view.busy => "Searching…",
            ViewMode::Searching => "No matches.",
        };
        frame.render_widget(
            Paragraph::new(Line::styled(empty, Style::default().fg(Color::DarkGray))),
            inner,
        );
        return;
    }

    let width = inner.width as usize;
    let items: Vec<ListItem> = view
        .entries
        .iter()
        .map(|entry| ListItem::new(entry_lines(entry, width)))
        .collect();
    let list = List::new(items).highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    );
    let mut state = ListState::default().with_selected(view.selected);
    frame.render_stateful_widget(list, inner, &mut state);
}

/// Date and query on the first row, response preview below.
fn entry_lines(entry: &HistoryEntry, width: usize) -> Vec<Line<'static>> {
    let stamp = entry.created_at.format("%m-%d %H:%M").to_string();
    let query_width = width.saturating_sub(stamp.len() + 1);
    let query = truncate_with_ellipsis(&single_line(&entry.query), query_width);
    let preview = truncate_with_ellipsis(&single_line(&entry.response), width.saturating_sub(2));
    vec![
        Line::from(vec![
            Span::styled(stamp, Style::default().fg(Color::DarkGray)),
            Span::raw(" "),
            Span::raw(query),
        ]),
        Line::from(vec![
            Span::raw("  "),
            Span::styled(preview, Style::default().fg(Color::DarkGray)),
        ]),
    ]
}
