//! Session runtime: executes effects and feeds results back to the reducer.
//!
//! This is the "Elm runtime" boundary. The reducer stays pure and produces
//! effects; this module spawns the transport calls and debounce timers on
//! tokio and collects their results through an inbox channel.
//!
//! Every method that executes effects must be called from inside a tokio
//! runtime.

mod handlers;
mod inbox;

use std::future::Future;
use std::sync::Arc;

use inbox::{SessionEventReceiver, SessionEventSender};
use inquiro_core::chat::{HistoryEntry, HistoryId};
use inquiro_core::transport::Transport;
use tokio::sync::mpsc;

use crate::common::{TaskId, TaskKind};
use crate::effects::SessionEffect;
use crate::events::{SessionAction, SessionEvent};
use crate::features::history::PageDirection;
use crate::state::{AppState, SessionSettings, SessionSnapshot};
use crate::update;

/// Owns the controller state and the transport.
pub struct SessionRuntime<T: Transport> {
    state: AppState,
    transport: Arc<T>,
    inbox_tx: SessionEventSender,
    inbox_rx: SessionEventReceiver,
}

impl<T: Transport> SessionRuntime<T> {
    pub fn new(transport: T, settings: SessionSettings) -> Self {
        Self::with_shared(Arc::new(transport), settings)
    }

    pub fn with_shared(transport: Arc<T>, settings: SessionSettings) -> Self {
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();
        Self {
            state: AppState::new(settings),
            transport,
            inbox_tx,
            inbox_rx,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.snapshot()
    }

    pub fn session_expired(&self) -> bool {
        self.state.session_expired
    }

    // ========================================================================
    // User intents
    // ========================================================================

    pub fn on_send(&mut self, text: &str) {
        self.act(SessionAction::Send {
            text: text.to_string(),
        });
    }

    pub fn on_query_change(&mut self, text: &str) {
        self.act(SessionAction::QueryChanged {
            text: text.to_string(),
        });
    }

    pub fn on_select_history(&mut self, entry: &HistoryEntry) {
        self.act(SessionAction::SelectHistory {
            entry: entry.clone(),
        });
    }

    pub fn on_delete_history(&mut self, id: HistoryId) {
        self.act(SessionAction::DeleteHistory { id });
    }

    pub fn on_clear_history(&mut self) {
        self.act(SessionAction::ClearHistory);
    }

    pub fn on_page_change(&mut self, direction: PageDirection) {
        self.act(SessionAction::PageChange { direction });
    }

    pub fn on_new_conversation(&mut self) {
        self.act(SessionAction::NewConversation);
    }

    /// Loads the current browse page (page 1 on startup).
    pub fn refresh(&mut self) {
        self.act(SessionAction::Refresh);
    }

    fn act(&mut self, action: SessionAction) {
        self.dispatch(SessionEvent::Action(action));
    }

    // ========================================================================
    // Event processing
    // ========================================================================

    /// Runs one event through the reducer and executes the resulting effects.
    pub fn dispatch(&mut self, event: SessionEvent) {
        let effects = update::update(&mut self.state, event);
        self.execute_effects(effects);
    }

    /// Processes every event already waiting in the inbox. Returns how many
    /// were handled.
    pub fn drain_inbox(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(event) = self.inbox_rx.try_recv() {
            self.dispatch(event);
            handled += 1;
        }
        handled
    }

    /// Waits for the next inbox event and processes it.
    pub async fn process_next(&mut self) {
        // The runtime holds a sender, so the channel never closes.
        if let Some(event) = self.inbox_rx.recv().await {
            self.dispatch(event);
        }
    }

    // ========================================================================
    // Effect dispatch
    // ========================================================================

    fn execute_effects(&mut self, effects: Vec<SessionEffect>) {
        for effect in effects {
            self.execute_effect(effect);
        }
    }

    /// Spawns a transport call and reports it back wrapped in `TaskCompleted`.
    fn spawn_task<Fut>(&self, kind: TaskKind, id: TaskId, fut: Fut)
    where
        Fut: Future<Output = SessionEvent> + Send + 'static,
    {
        let tx = self.inbox_tx.clone();
        tracing::trace!(task = %id, kind = kind.label(), "spawning task");
        tokio::spawn(async move {
            let inner = fut.await;
            let _ = tx.send(SessionEvent::completed(kind, id, inner));
        });
    }

    fn execute_effect(&mut self, effect: SessionEffect) {
        let transport = Arc::clone(&self.transport);
        match effect {
            SessionEffect::SendChat {
                task,
                message,
                epoch,
            } => {
                self.spawn_task(
                    TaskKind::Send,
                    task,
                    handlers::send_chat(transport, message, epoch),
                );
            }
            SessionEffect::LoadHistoryPage {
                task,
                page,
                page_size,
            } => {
                self.spawn_task(
                    TaskKind::HistoryLoad,
                    task,
                    handlers::load_history_page(transport, page, page_size),
                );
            }
            SessionEffect::DeleteHistory { task, id } => {
                self.spawn_task(
                    TaskKind::HistoryDelete,
                    task,
                    handlers::delete_history(transport, id),
                );
            }
            SessionEffect::ClearHistory { task } => {
                self.spawn_task(
                    TaskKind::HistoryClear,
                    task,
                    handlers::clear_history(transport),
                );
            }
            SessionEffect::SearchHistory {
                task,
                query,
                page_size,
            } => {
                self.spawn_task(
                    TaskKind::Search,
                    task,
                    handlers::search_history(transport, query, page_size),
                );
            }
            SessionEffect::ScheduleSearch {
                generation,
                delay,
                cancel,
            } => {
                let tx = self.inbox_tx.clone();
                tokio::spawn(async move {
                    if let Some(event) = handlers::debounce(generation, delay, cancel).await {
                        let _ = tx.send(event);
                    }
                });
            }
            SessionEffect::CancelDebounce { token } => {
                token.cancel();
            }
        }
    }
}
