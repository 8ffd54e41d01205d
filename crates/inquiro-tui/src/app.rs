//! Interactive event loop: terminal input in, controller actions out.
//!
//! `ViewState` holds purely presentational state (focus, input buffers,
//! selection, scroll). Everything the controller owns lives in `AppState`
//! behind the runtime.

use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use inquiro_core::chat::HistoryEntry;
use inquiro_core::transport::Transport;

use crate::features::history::PageDirection;
use crate::features::input::LineInput;
use crate::render;
use crate::runtime::SessionRuntime;
use crate::terminal::Tui;

/// Upper bound on how long the loop waits for terminal input before
/// checking the inbox again.
pub const POLL_INTERVAL: Duration = Duration::from_millis(50);

const SCROLL_PAGE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Prompt,
    History,
}

#[derive(Debug, Default)]
pub struct ViewState {
    pub focus: Focus,
    pub prompt: LineInput,
    pub query: LineInput,
    pub selected: usize,
    /// Lines scrolled up from the bottom of the transcript.
    pub transcript_scroll: usize,
    /// Waiting for y/n before clearing all history.
    pub confirm_clear: bool,
    pub should_quit: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    Quit,
    SessionExpired,
}

pub struct App<T: Transport> {
    runtime: SessionRuntime<T>,
    view: ViewState,
}

impl<T: Transport> App<T> {
    pub fn new(runtime: SessionRuntime<T>) -> Self {
        Self {
            runtime,
            view: ViewState::default(),
        }
    }

    pub fn runtime(&self) -> &SessionRuntime<T> {
        &self.runtime
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// Runs until the user quits or the session expires.
    ///
    /// # Errors
    /// Returns an error if drawing or reading terminal events fails.
    pub fn run(&mut self, terminal: &mut Tui) -> Result<ExitReason> {
        loop {
            self.runtime.drain_inbox();
            if self.runtime.session_expired() {
                return Ok(ExitReason::SessionExpired);
            }
            if self.view.should_quit {
                return Ok(ExitReason::Quit);
            }

            terminal.draw(|frame| render::render(self.runtime.state(), &self.view, frame))?;

            if event::poll(POLL_INTERVAL)? {
                self.handle_event(event::read()?);
                while event::poll(Duration::ZERO)? {
                    self.handle_event(event::read()?);
                }
            }
        }
    }

    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => self.handle_key(key),
            Event::Paste(text) => match self.view.focus {
                Focus::Prompt => self.view.prompt.insert_str(&text),
                Focus::History => {
                    self.view.query.insert_str(&text);
                    self.query_changed();
                }
            },
            _ => {}
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        if ctrl && key.code == KeyCode::Char('c') {
            self.view.should_quit = true;
            return;
        }

        if self.view.confirm_clear {
            match key.code {
                KeyCode::Char('y' | 'Y') => {
                    self.view.confirm_clear = false;
                    self.view.selected = 0;
                    self.runtime.on_clear_history();
                }
                KeyCode::Char('n' | 'N') | KeyCode::Esc => self.view.confirm_clear = false,
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Tab | KeyCode::BackTab => {
                self.view.focus = match self.view.focus {
                    Focus::Prompt => Focus::History,
                    Focus::History => Focus::Prompt,
                };
                return;
            }
            KeyCode::Char('n') if ctrl => {
                self.runtime.on_new_conversation();
                self.view.transcript_scroll = 0;
                return;
            }
            _ => {}
        }

        match self.view.focus {
            Focus::Prompt => self.handle_prompt_key(key),
            Focus::History => self.handle_history_key(key),
        }
    }

    fn handle_prompt_key(&mut self, key: KeyEvent) {
        let scroll = &mut self.view.transcript_scroll;
        match key.code {
            KeyCode::Enter => {
                let text = self.view.prompt.take();
                self.runtime.on_send(&text);
                *scroll = 0;
            }
            KeyCode::Up => *scroll = scroll.saturating_add(1),
            KeyCode::Down => *scroll = scroll.saturating_sub(1),
            KeyCode::PageUp => *scroll = scroll.saturating_add(SCROLL_PAGE),
            KeyCode::PageDown => *scroll = scroll.saturating_sub(SCROLL_PAGE),
            _ => {
                self.view.prompt.input(key);
            }
        }
    }

    fn handle_history_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Enter => {
                if let Some(entry) = self.selected_entry().cloned() {
                    self.runtime.on_select_history(&entry);
                    self.view.transcript_scroll = 0;
                    self.view.focus = Focus::Prompt;
                }
            }
            KeyCode::Esc => {
                if self.view.query.is_empty() {
                    self.view.focus = Focus::Prompt;
                } else {
                    self.view.query.take();
                    self.query_changed();
                }
            }
            KeyCode::Up => self.view.selected = self.view.selected.saturating_sub(1),
            KeyCode::Down => {
                let len = self.runtime.state().visible_entries().len();
                self.view.selected = (self.view.selected + 1).min(len.saturating_sub(1));
            }
            KeyCode::PageUp => {
                self.view.selected = 0;
                self.runtime.on_page_change(PageDirection::Previous);
            }
            KeyCode::PageDown => {
                self.view.selected = 0;
                self.runtime.on_page_change(PageDirection::Next);
            }
            KeyCode::Char('d') if ctrl => {
                if let Some(entry) = self.selected_entry() {
                    let id = entry.id.clone();
                    self.runtime.on_delete_history(id);
                }
            }
            KeyCode::Char('x') if ctrl => self.view.confirm_clear = true,
            _ => {
                if self.view.query.input(key) {
                    self.query_changed();
                }
            }
        }
    }

    fn query_changed(&mut self) {
        self.view.selected = 0;
        let text = self.view.query.text().to_string();
        self.runtime.on_query_change(&text);
    }

    fn selected_entry(&self) -> Option<&HistoryEntry> {
        let entries = self.runtime.state().visible_entries();
        entries.get(self.view.selected.min(entries.len().saturating_sub(1)))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use inquiro_core::chat::{ChatReply, HistoryId, Message, Page};
    use inquiro_core::transport::TransportResult;

    use super::*;
    use crate::features::search::ViewMode;
    use crate::state::SessionSettings;

    /// Backend with two fixed entries.
    struct StaticTransport;

    fn entries() -> Vec<HistoryEntry> {
        (1..=2)
            .map(|i| HistoryEntry {
                id: HistoryId::from(i),
                query: format!("question {i}"),
                response: format!("answer {i}"),
                created_at: Utc::now(),
            })
            .collect()
    }

    impl Transport for StaticTransport {
        async fn send_chat(&self, message: &str) -> TransportResult<ChatReply> {
            Ok(ChatReply {
                reply: message.to_uppercase(),
            })
        }

        async fn list_history(&self, page: u32, _page_size: u32) -> TransportResult<Page> {
            Ok(Page {
                items: entries(),
                page_number: page,
                total_pages: 1,
            })
        }

        async fn search_history(
            &self,
            _query: &str,
            _page: u32,
            _page_size: u32,
        ) -> TransportResult<Vec<HistoryEntry>> {
            Ok(Vec::new())
        }

        async fn delete_history(&self, _id: &HistoryId) -> TransportResult<()> {
            Ok(())
        }

        async fn clear_history(&self) -> TransportResult<()> {
            Ok(())
        }
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn ctrl(ch: char) -> Event {
        Event::Key(KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL))
    }

    async fn loaded_app() -> App<StaticTransport> {
        let mut runtime = SessionRuntime::new(StaticTransport, SessionSettings::default());
        runtime.refresh();
        runtime.process_next().await;
        App::new(runtime)
    }

    #[tokio::test]
    async fn test_tab_toggles_focus() {
        let mut app = loaded_app().await;
        assert_eq!(app.view().focus, Focus::Prompt);
        app.handle_event(key(KeyCode::Tab));
        assert_eq!(app.view().focus, Focus::History);
        app.handle_event(key(KeyCode::Tab));
        assert_eq!(app.view().focus, Focus::Prompt);
    }

    #[tokio::test]
    async fn test_enter_sends_prompt_and_clears_input() {
        let mut app = loaded_app().await;
        for ch in "hi".chars() {
            app.handle_event(key(KeyCode::Char(ch)));
        }
        app.handle_event(key(KeyCode::Enter));

        assert!(app.view().prompt.is_empty());
        assert_eq!(
            app.runtime().state().transcript.messages(),
            &[Message::user("hi")]
        );
    }

    #[tokio::test]
    async fn test_typing_in_history_edits_query() {
        let mut app = loaded_app().await;
        app.handle_event(key(KeyCode::Tab));
        app.handle_event(key(KeyCode::Char('q')));

        assert_eq!(app.runtime().state().search.query_text(), "q");
        assert_eq!(app.runtime().state().view_mode(), ViewMode::Searching);

        app.handle_event(key(KeyCode::Esc));
        assert_eq!(app.runtime().state().view_mode(), ViewMode::Browsing);
        assert_eq!(app.view().focus, Focus::History);
    }

    #[tokio::test]
    async fn test_enter_in_history_replays_selected_entry() {
        let mut app = loaded_app().await;
        app.handle_event(key(KeyCode::Tab));
        app.handle_event(key(KeyCode::Down));
        app.handle_event(key(KeyCode::Enter));

        assert_eq!(
            app.runtime().state().transcript.messages(),
            &[Message::user("question 2"), Message::agent("answer 2")]
        );
        assert_eq!(app.view().focus, Focus::Prompt);
    }

    #[tokio::test]
    async fn test_clear_requires_confirmation() {
        let mut app = loaded_app().await;
        app.handle_event(key(KeyCode::Tab));
        app.handle_event(ctrl('x'));
        assert!(app.view().confirm_clear);

        app.handle_event(key(KeyCode::Char('n')));
        assert!(!app.view().confirm_clear);
        assert!(!app.runtime().state().history.is_mutating());

        app.handle_event(ctrl('x'));
        app.handle_event(key(KeyCode::Char('y')));
        assert!(!app.view().confirm_clear);
        assert!(app.runtime().state().history.is_mutating());
    }

    #[tokio::test]
    async fn test_ctrl_c_quits() {
        let mut app = loaded_app().await;
        app.handle_event(ctrl('c'));
        assert!(app.view().should_quit);
    }
}
