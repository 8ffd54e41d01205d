//! Controller reducer.
//!
//! `update` is the only place `AppState` changes. It never performs I/O:
//! requests and timers are returned as `SessionEffect`s and their results
//! come back later as events.

use inquiro_core::chat::{ChatReply, Page};
use inquiro_core::transport::TransportResult;

use crate::common::Completion;
use crate::effects::SessionEffect;
use crate::events::{HistoryEvent, SearchEvent, SessionAction, SessionEvent, TranscriptEvent};
use crate::features::history::{self, PageDirection};
use crate::features::search::{self, ViewMode};
use crate::features::transcript;
use crate::state::AppState;

pub fn update(app: &mut AppState, event: SessionEvent) -> Vec<SessionEffect> {
    match event {
        SessionEvent::Action(action) => {
            if app.session_expired {
                tracing::debug!(?action, "session expired, ignoring action");
                return vec![];
            }
            handle_action(app, action)
        }
        SessionEvent::TaskCompleted { kind, completed } => {
            let state = app.task_state_mut(kind);
            let accepted = if kind.latest_wins() {
                state.finish_if_active(completed.id)
            } else {
                state.finish(completed.id);
                true
            };
            if !accepted {
                tracing::debug!(task = %completed.id, kind = kind.label(), "dropping stale result");
                return vec![];
            }
            let effects = update(app, *completed.result);
            if app.session_expired && app.expired_by.is_none() {
                tracing::warn!(task = %completed.id, kind = kind.label(), "session expired");
                app.expired_by = Some(completed.id);
            }
            effects
        }
        SessionEvent::Transcript(TranscriptEvent::ReplyReceived { epoch, result }) => {
            handle_reply(app, epoch, result)
        }
        SessionEvent::History(event) => handle_history_event(app, event),
        SessionEvent::Search(event) => handle_search_event(app, event),
    }
}

fn handle_action(app: &mut AppState, action: SessionAction) -> Vec<SessionEffect> {
    match action {
        SessionAction::Send { text } => {
            transcript::update::submit(&mut app.transcript, &mut app.task_seq, &text)
        }
        SessionAction::QueryChanged { text } => {
            search::update::handle_query_change(&mut app.search, &text, app.settings.debounce)
        }
        SessionAction::SelectHistory { entry } => {
            app.transcript.replace_with_entry(&entry);
            vec![]
        }
        SessionAction::DeleteHistory { id } => {
            history::update::delete_entry(&mut app.history, &mut app.task_seq, id)
        }
        SessionAction::ClearHistory => {
            history::update::clear_all(&mut app.history, &mut app.task_seq)
        }
        SessionAction::PageChange { direction } => {
            let current = app.history.target_page();
            let target = clamp_page(current, app.history.total_pages(), direction);
            if target == current {
                return vec![];
            }
            history::update::load_page(
                &mut app.history,
                &mut app.task_seq,
                target,
                app.settings.history_page_size,
            )
        }
        SessionAction::NewConversation => {
            app.transcript.clear();
            vec![]
        }
        SessionAction::Refresh => {
            let page = app.history.target_page();
            refresh_history(app, page)
        }
    }
}

fn handle_reply(
    app: &mut AppState,
    epoch: u64,
    result: TransportResult<ChatReply>,
) -> Vec<SessionEffect> {
    match transcript::update::handle_reply(&mut app.transcript, epoch, result) {
        Completion::Applied => {
            let page = app.history.target_page();
            let mut effects = refresh_history(app, page);
            effects.extend(transcript::update::dispatch_queued(
                &mut app.transcript,
                &mut app.task_seq,
            ));
            effects
        }
        Completion::Failed => {
            transcript::update::dispatch_queued(&mut app.transcript, &mut app.task_seq)
        }
        Completion::Expired => expire(app),
    }
}

fn handle_history_event(app: &mut AppState, event: HistoryEvent) -> Vec<SessionEffect> {
    match event {
        HistoryEvent::PageLoaded { result } => {
            let outcome = history::update::handle_page_loaded(&mut app.history, result);
            match outcome {
                Completion::Applied => reload_if_past_end(app),
                Completion::Failed => vec![],
                Completion::Expired => expire(app),
            }
        }
        HistoryEvent::Deleted { id, result } => {
            match history::update::handle_mutation("delete", result) {
                Completion::Applied => {
                    tracing::info!(id = %id, "history entry deleted");
                    let page = app.history.target_page();
                    refresh_history(app, page)
                }
                Completion::Failed => vec![],
                Completion::Expired => expire(app),
            }
        }
        HistoryEvent::Cleared { result } => {
            match history::update::handle_mutation("clear", result) {
                Completion::Applied => {
                    tracing::info!("history cleared");
                    refresh_history(app, 1)
                }
                Completion::Failed => vec![],
                Completion::Expired => expire(app),
            }
        }
    }
}

fn handle_search_event(app: &mut AppState, event: SearchEvent) -> Vec<SessionEffect> {
    match event {
        SearchEvent::DebounceElapsed { generation } => search::update::handle_debounce_elapsed(
            &mut app.search,
            &mut app.task_seq,
            generation,
            app.settings.search_page_size,
        ),
        SearchEvent::ResultsReceived { query, result } => {
            match search::update::handle_results(&mut app.search, &query, result) {
                Completion::Applied | Completion::Failed => vec![],
                Completion::Expired => expire(app),
            }
        }
    }
}

/// Reloads `page` of the browse list, and the search results when a
/// settled query is showing.
fn refresh_history(app: &mut AppState, page: u32) -> Vec<SessionEffect> {
    let mut effects = history::update::load_page(
        &mut app.history,
        &mut app.task_seq,
        page,
        app.settings.history_page_size,
    );
    if app.view_mode() == ViewMode::Searching {
        effects.extend(search::update::refresh(
            &mut app.search,
            &mut app.task_seq,
            app.settings.search_page_size,
        ));
    }
    effects
}

/// A delete can leave the current page past the end; step back to the last page.
fn reload_if_past_end(app: &mut AppState) -> Vec<SessionEffect> {
    let Page {
        items,
        page_number,
        total_pages,
    } = app.history.page();
    if items.is_empty() && page_number > total_pages {
        let last = *total_pages;
        return history::update::load_page(
            &mut app.history,
            &mut app.task_seq,
            last,
            app.settings.history_page_size,
        );
    }
    vec![]
}

fn expire(app: &mut AppState) -> Vec<SessionEffect> {
    app.session_expired = true;
    search::update::cancel_pending(&mut app.search)
}

/// Target page for a page change, clamped to `[1, max(total_pages, 1)]`.
pub fn clamp_page(current: u32, total_pages: u32, direction: PageDirection) -> u32 {
    let last = total_pages.max(1);
    let target = match direction {
        PageDirection::Previous => current.saturating_sub(1),
        PageDirection::Next => current.saturating_add(1),
    };
    target.clamp(1, last)
}
