//! Search reducer.
//!
//! Every query edit cancels the pending timer and arms a new one; only the
//! timer that survives the quiet interval issues a request. Responses are
//! filtered upstream by `TaskState::finish_if_active`, so the handlers here
//! only ever see the latest request's result.

use std::time::Duration;

use inquiro_core::chat::HistoryEntry;
use inquiro_core::transport::TransportResult;
use tokio_util::sync::CancellationToken;

use super::SearchState;
use super::state::PendingDebounce;
use crate::common::{Completion, TaskSeq};
use crate::effects::SessionEffect;

/// Handles a query edit.
///
/// An empty (trimmed) query returns to browsing immediately: no timer, no
/// request, results cleared, and any in-flight response becomes stale.
pub fn handle_query_change(
    search: &mut SearchState,
    text: &str,
    delay: Duration,
) -> Vec<SessionEffect> {
    let mut effects = Vec::new();
    if let Some(pending) = search.debounce.take() {
        effects.push(SessionEffect::CancelDebounce {
            token: pending.cancel,
        });
    }

    search.query_text = text.to_string();

    if text.trim().is_empty() {
        search.results.clear();
        search.is_searching = false;
        search.request.invalidate();
        return effects;
    }

    search.debounce_generation = search.debounce_generation.wrapping_add(1);
    let generation = search.debounce_generation;
    let cancel = CancellationToken::new();
    search.debounce = Some(PendingDebounce {
        generation,
        cancel: cancel.clone(),
    });
    effects.push(SessionEffect::ScheduleSearch {
        generation,
        delay,
        cancel,
    });
    effects
}

/// Handles timer expiry. Expiries of superseded timers are ignored.
pub fn handle_debounce_elapsed(
    search: &mut SearchState,
    seq: &mut TaskSeq,
    generation: u64,
    page_size: u32,
) -> Vec<SessionEffect> {
    match &search.debounce {
        Some(pending) if pending.generation == generation => {}
        _ => return vec![],
    }
    search.debounce = None;
    issue(search, seq, page_size)
}

/// Re-issues the current query after history changed underneath it.
///
/// Skipped while a debounce is pending; that timer will issue the
/// up-to-date query anyway.
pub fn refresh(search: &mut SearchState, seq: &mut TaskSeq, page_size: u32) -> Vec<SessionEffect> {
    if search.debounce.is_some() {
        return vec![];
    }
    issue(search, seq, page_size)
}

fn issue(search: &mut SearchState, seq: &mut TaskSeq, page_size: u32) -> Vec<SessionEffect> {
    let query = search.query_text.trim().to_string();
    if query.is_empty() {
        return vec![];
    }
    let task = seq.next_id();
    search.request.begin(task);
    search.is_searching = true;
    tracing::debug!(%task, query = %query, "issuing search");
    vec![SessionEffect::SearchHistory {
        task,
        query,
        page_size,
    }]
}

/// Stops a pending timer without touching the query.
pub fn cancel_pending(search: &mut SearchState) -> Vec<SessionEffect> {
    search
        .debounce
        .take()
        .map(|pending| SessionEffect::CancelDebounce {
            token: pending.cancel,
        })
        .into_iter()
        .collect()
}

/// Applies the response of the latest search request.
pub fn handle_results(
    search: &mut SearchState,
    query: &str,
    result: TransportResult<Vec<HistoryEntry>>,
) -> Completion {
    search.is_searching = false;
    match result {
        Ok(entries) => {
            tracing::debug!(query = %query, count = entries.len(), "search results");
            search.results = entries;
            Completion::Applied
        }
        Err(error) if error.is_unauthorized() => Completion::Expired,
        Err(error) => {
            tracing::warn!(query = %query, kind = %error.kind, error = %error, "search failed");
            search.results.clear();
            Completion::Failed
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use inquiro_core::chat::HistoryId;
    use inquiro_core::transport::TransportError;

    use super::*;
    use crate::features::search::ViewMode;

    const DELAY: Duration = Duration::from_millis(500);

    fn entry(id: u64, query: &str) -> HistoryEntry {
        HistoryEntry {
            id: HistoryId::from(id),
            query: query.to_string(),
            response: String::new(),
            created_at: Utc::now(),
        }
    }

    fn scheduled_generation(effects: &[SessionEffect]) -> u64 {
        effects
            .iter()
            .find_map(|e| match e {
                SessionEffect::ScheduleSearch { generation, .. } => Some(*generation),
                _ => None,
            })
            .unwrap()
    }

    #[test]
    fn test_change_cancels_previous_timer() {
        let mut search = SearchState::default();
        let first = handle_query_change(&mut search, "b", DELAY);
        assert_eq!(first.len(), 1);

        let second = handle_query_change(&mut search, "bo", DELAY);
        assert!(matches!(second[0], SessionEffect::CancelDebounce { .. }));
        assert!(matches!(second[1], SessionEffect::ScheduleSearch { .. }));
        assert_eq!(search.view_mode(), ViewMode::Searching);
    }

    #[test]
    fn test_superseded_timer_expiry_is_ignored() {
        let mut search = SearchState::default();
        let mut seq = TaskSeq::default();
        let old = scheduled_generation(&handle_query_change(&mut search, "b", DELAY));
        let new = scheduled_generation(&handle_query_change(&mut search, "bose", DELAY));

        assert!(handle_debounce_elapsed(&mut search, &mut seq, old, 20).is_empty());

        let effects = handle_debounce_elapsed(&mut search, &mut seq, new, 20);
        assert!(matches!(
            effects.as_slice(),
            [SessionEffect::SearchHistory { query, .. }] if query == "bose"
        ));
        assert!(search.is_searching());
        assert!(search.pending_request_id().is_some());
    }

    #[test]
    fn test_empty_query_returns_to_idle() {
        let mut search = SearchState::default();
        let mut seq = TaskSeq::default();
        let generation = scheduled_generation(&handle_query_change(&mut search, "x", DELAY));
        handle_debounce_elapsed(&mut search, &mut seq, generation, 20);
        search.results = vec![entry(1, "x")];

        let effects = handle_query_change(&mut search, "   ", DELAY);

        assert!(effects.is_empty());
        assert!(search.results().is_empty());
        assert!(!search.is_searching());
        assert_eq!(search.pending_request_id(), None);
        assert_eq!(search.view_mode(), ViewMode::Browsing);
    }

    #[test]
    fn test_query_is_trimmed_when_issued() {
        let mut search = SearchState::default();
        let mut seq = TaskSeq::default();
        let generation = scheduled_generation(&handle_query_change(&mut search, "  bose ", DELAY));
        let effects = handle_debounce_elapsed(&mut search, &mut seq, generation, 20);
        assert!(matches!(
            effects.as_slice(),
            [SessionEffect::SearchHistory { query, .. }] if query == "bose"
        ));
        assert_eq!(search.query_text(), "  bose ");
    }

    #[test]
    fn test_failure_clears_results() {
        let mut search = SearchState::default();
        search.results = vec![entry(1, "a")];
        search.is_searching = true;

        let outcome = handle_results(&mut search, "a", Err(TransportError::timeout("slow")));

        assert_eq!(outcome, Completion::Failed);
        assert!(search.results().is_empty());
        assert!(!search.is_searching());
    }

    #[test]
    fn test_refresh_skipped_while_debounce_pending() {
        let mut search = SearchState::default();
        let mut seq = TaskSeq::default();
        handle_query_change(&mut search, "a", DELAY);
        assert!(refresh(&mut search, &mut seq, 20).is_empty());
    }
}
