//! Markdown rendering for agent replies.
//!
//! Produces unwrapped logical lines; the transcript renderer wraps them to
//! the viewport. HTML is dropped to avoid terminal injection.

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Parser, Tag, TagEnd};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

/// Parses `text` as markdown into styled lines.
pub fn render_markdown(text: &str, base: Style) -> Vec<Line<'static>> {
    if text.trim().is_empty() {
        return vec![Line::default()];
    }

    let mut renderer = MarkdownRenderer::new(base);
    for event in Parser::new(text) {
        renderer.process_event(event);
    }
    renderer.finish()
}

struct MarkdownRenderer {
    lines: Vec<Line<'static>>,
    current: Vec<Span<'static>>,
    style_stack: Vec<Style>,
    in_code_block: bool,
    code_lang: Option<String>,
    /// `None` for bullets, `Some(n)` for the next ordered item number.
    list_stack: Vec<Option<u64>>,
    /// Set at the start of an item until its first line is emitted.
    item_marker_pending: bool,
    in_blockquote: bool,
}

impl MarkdownRenderer {
    fn new(base: Style) -> Self {
        Self {
            lines: Vec::new(),
            current: Vec::new(),
            style_stack: vec![base],
            in_code_block: false,
            code_lang: None,
            list_stack: Vec::new(),
            item_marker_pending: false,
            in_blockquote: false,
        }
    }

    fn current_style(&self) -> Style {
        self.style_stack.last().copied().unwrap_or_default()
    }

    fn push_modifier(&mut self, modifier: Modifier) {
        let style = self.current_style().add_modifier(modifier);
        self.style_stack.push(style);
    }

    fn pop_style(&mut self) {
        if self.style_stack.len() > 1 {
            self.style_stack.pop();
        }
    }

    fn process_event(&mut self, event: Event) {
        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(tag) => self.end_tag(tag),
            Event::Text(text) => {
                let style = self.current_style();
                self.current.push(Span::styled(text.to_string(), style));
            }
            Event::Code(code) => {
                self.current.push(Span::styled(
                    code.to_string(),
                    Style::default().fg(Color::Yellow),
                ));
            }
            Event::SoftBreak => {
                let style = self.current_style();
                self.current.push(Span::styled(" ", style));
            }
            Event::HardBreak => self.flush_block(),
            Event::TaskListMarker(checked) => {
                let marker = if checked { "[x] " } else { "[ ] " };
                self.current.push(Span::raw(marker));
            }
            Event::Rule => {
                self.flush_block();
                self.lines.push(Line::styled(
                    "─".repeat(24),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            _ => {}
        }
    }

    fn start_tag(&mut self, tag: Tag) {
        match tag {
            Tag::Heading { level, .. } => {
                let style = match level {
                    HeadingLevel::H1 | HeadingLevel::H2 => self
                        .current_style()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                    _ => self.current_style().add_modifier(Modifier::BOLD),
                };
                self.style_stack.push(style);
            }
            Tag::CodeBlock(kind) => {
                self.flush_block();
                self.in_code_block = true;
                self.code_lang = match kind {
                    CodeBlockKind::Fenced(lang) if !lang.is_empty() => Some(lang.to_string()),
                    _ => None,
                };
            }
            Tag::List(start) => {
                self.flush_block();
                self.list_stack.push(start);
            }
            Tag::Item => {
                self.flush_block();
                self.item_marker_pending = true;
            }
            Tag::BlockQuote(_) => {
                self.flush_block();
                self.in_blockquote = true;
                self.push_modifier(Modifier::ITALIC);
            }
            Tag::Emphasis => self.push_modifier(Modifier::ITALIC),
            Tag::Strong => self.push_modifier(Modifier::BOLD),
            Tag::Strikethrough => self.push_modifier(Modifier::CROSSED_OUT),
            Tag::Link { .. } => {
                let style = self
                    .current_style()
                    .fg(Color::Blue)
                    .add_modifier(Modifier::UNDERLINED);
                self.style_stack.push(style);
            }
            _ => {}
        }
    }

    fn end_tag(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => {
                self.flush_block();
                if self.list_stack.is_empty() {
                    self.lines.push(Line::default());
                }
            }
            TagEnd::Heading(_) => {
                self.flush_block();
                self.pop_style();
                self.lines.push(Line::default());
            }
            TagEnd::CodeBlock => {
                self.flush_code_block();
                self.in_code_block = false;
                self.lines.push(Line::default());
            }
            TagEnd::List(_) => {
                self.flush_block();
                self.list_stack.pop();
                if self.list_stack.is_empty() {
                    self.lines.push(Line::default());
                }
            }
            TagEnd::Item => {
                self.flush_block();
                if let Some(Some(n)) = self.list_stack.last_mut() {
                    *n += 1;
                }
            }
            TagEnd::BlockQuote(_) => {
                self.flush_block();
                self.in_blockquote = false;
                self.pop_style();
            }
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough | TagEnd::Link => {
                self.pop_style();
            }
            _ => {}
        }
    }

    fn flush_block(&mut self) {
        if self.current.is_empty() || self.in_code_block {
            return;
        }
        let mut spans = self.list_prefix();
        if self.in_blockquote {
            spans.push(Span::styled("│ ", Style::default().fg(Color::DarkGray)));
        }
        spans.append(&mut self.current);
        self.lines.push(Line::from(spans));
    }

    /// Bullet or number for the first line of an item, hanging indent after.
    fn list_prefix(&mut self) -> Vec<Span<'static>> {
        let Some(kind) = self.list_stack.last() else {
            return Vec::new();
        };
        let marker = match kind {
            Some(n) => format!("{n}. "),
            None => "• ".to_string(),
        };
        let indent = Span::raw("  ".repeat(self.list_stack.len() - 1));
        if std::mem::take(&mut self.item_marker_pending) {
            vec![indent, Span::styled(marker, Style::default().fg(Color::Cyan))]
        } else {
            vec![indent, Span::raw(" ".repeat(marker.chars().count()))]
        }
    }

    fn flush_code_block(&mut self) {
        let text: String = self
            .current
            .drain(..)
            .map(|span| span.content.into_owned())
            .collect();
        let fence_style = Style::default().fg(Color::DarkGray);
        let fence = match self.code_lang.take() {
            Some(lang) => format!("```{lang}"),
            None => "```".to_string(),
        };
        self.lines.push(Line::styled(fence, fence_style));
        for line in text.trim_end_matches('\n').split('\n') {
            self.lines.push(Line::from(vec![
                Span::raw("  "),
                Span::styled(line.to_string(), Style::default().fg(Color::Green)),
            ]));
        }
        self.lines.push(Line::styled("```", fence_style));
    }

    fn finish(mut self) -> Vec<Line<'static>> {
        if self.in_code_block {
            self.flush_code_block();
        } else {
            self.flush_block();
        }
        while self.lines.last().is_some_and(|l| l.spans.is_empty()) {
            self.lines.pop();
        }
        if self.lines.is_empty() {
            self.lines.push(Line::default());
        }
        self.lines
    }
}
