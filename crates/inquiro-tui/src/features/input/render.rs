use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph};

use super::LineInput;

/// Renders a bordered single-line input, scrolled so the cursor stays visible.
pub fn render_input(
    frame: &mut Frame,
    area: Rect,
    input: &LineInput,
    title: &str,
    placeholder: &str,
    focused: bool,
) {
    let border = if focused { Color::Cyan } else { Color::DarkGray };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(format!(" {title} "));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let cursor = input.cursor_column();
    let width = inner.width as usize;
    let offset = (cursor + 1).saturating_sub(width);

    if input.is_empty() {
        frame.render_widget(
            Paragraph::new(Line::styled(
                placeholder.to_string(),
                Style::default().fg(Color::DarkGray),
            )),
            inner,
        );
    } else {
        let scroll = u16::try_from(offset).unwrap_or(u16::MAX);
        frame.render_widget(Paragraph::new(input.text()).scroll((0, scroll)), inner);
    }

    if focused && width > 0 {
        let col = (cursor - offset).min(width - 1);
        let x = inner.x + u16::try_from(col).unwrap_or(0);
        frame.set_cursor_position(Position::new(x, inner.y));
    }
}
