//! Text utilities for TUI rendering.
//!
//! Width math is done in terminal columns so CJK and emoji lay out correctly.

use ratatui::text::{Line, Span};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Truncates a string with ellipsis if it exceeds `max_width` columns.
pub fn truncate_with_ellipsis(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width <= 1 {
        return "…".to_string();
    }
    let mut truncated = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if used + ch_width + 1 > max_width {
            break;
        }
        used += ch_width;
        truncated.push(ch);
    }
    truncated.push('…');
    truncated
}

/// Collapses newlines and runs of whitespace into single spaces.
///
/// History rows show one line per entry, so multi-line queries are flattened.
pub fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Word-wraps a styled line to `width` columns.
///
/// Breaks on word boundaries; words wider than the line are split by
/// grapheme. Leading whitespace on continuation lines is dropped.
pub fn wrap_line(line: Line<'static>, width: usize) -> Vec<Line<'static>> {
    let width = width.max(1);
    if line.width() <= width {
        return vec![line];
    }

    let mut lines = Vec::new();
    let mut current: Vec<Span<'static>> = Vec::new();
    let mut used = 0;

    for span in line.spans {
        let style = span.style;
        for word in span.content.split_word_bounds() {
            let word_width = word.width();
            let is_space = word.chars().all(char::is_whitespace);

            if used + word_width <= width {
                if !(is_space && used == 0 && !lines.is_empty()) {
                    current.push(Span::styled(word.to_string(), style));
                    used += word_width;
                }
                continue;
            }

            if is_space {
                push_trimmed(&mut lines, std::mem::take(&mut current));
                used = 0;
                continue;
            }

            if used > 0 && word_width <= width {
                push_trimmed(&mut lines, std::mem::take(&mut current));
                current.push(Span::styled(word.to_string(), style));
                used = word_width;
                continue;
            }

            for grapheme in word.graphemes(true) {
                let g_width = grapheme.width();
                if used + g_width > width && used > 0 {
                    push_trimmed(&mut lines, std::mem::take(&mut current));
                    used = 0;
                }
                current.push(Span::styled(grapheme.to_string(), style));
                used += g_width;
            }
        }
    }

    if !current.is_empty() || lines.is_empty() {
        push_trimmed(&mut lines, current);
    }
    lines
}

fn push_trimmed(lines: &mut Vec<Line<'static>>, mut spans: Vec<Span<'static>>) {
    while spans
        .last()
        .is_some_and(|s| s.content.chars().all(char::is_whitespace))
    {
        spans.pop();
    }
    lines.push(Line::from(spans));
}
