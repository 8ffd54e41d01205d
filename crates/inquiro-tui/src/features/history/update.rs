//! History reducer: page fetches, deletes and clears.

use inquiro_core::chat::{HistoryId, Page};
use inquiro_core::transport::TransportResult;

use super::HistoryState;
use crate::common::{Completion, TaskSeq};
use crate::effects::SessionEffect;

pub fn load_page(
    history: &mut HistoryState,
    seq: &mut TaskSeq,
    page: u32,
    page_size: u32,
) -> Vec<SessionEffect> {
    let page = page.max(1);
    let task = seq.next_id();
    history.load.begin(task);
    history.set_requested_page(Some(page));
    vec![SessionEffect::LoadHistoryPage {
        task,
        page,
        page_size,
    }]
}

pub fn delete_entry(
    history: &mut HistoryState,
    seq: &mut TaskSeq,
    id: HistoryId,
) -> Vec<SessionEffect> {
    let task = seq.next_id();
    history.mutations.begin(task);
    vec![SessionEffect::DeleteHistory { task, id }]
}

pub fn clear_all(history: &mut HistoryState, seq: &mut TaskSeq) -> Vec<SessionEffect> {
    let task = seq.next_id();
    history.mutations.begin(task);
    vec![SessionEffect::ClearHistory { task }]
}

/// Stores a freshly fetched page. On failure the previous page stays and
/// becomes the paging target again.
pub fn handle_page_loaded(history: &mut HistoryState, result: TransportResult<Page>) -> Completion {
    match result {
        Ok(page) => {
            tracing::debug!(
                page = page.page_number,
                total_pages = page.total_pages,
                count = page.items.len(),
                "history page loaded"
            );
            history.replace_page(page);
            Completion::Applied
        }
        Err(error) if error.is_unauthorized() => {
            history.set_requested_page(None);
            Completion::Expired
        }
        Err(error) => {
            tracing::warn!(kind = %error.kind, error = %error, "failed to load history page");
            history.set_requested_page(None);
            Completion::Failed
        }
    }
}

/// Classifies a delete/clear result. Failures are logged and otherwise
/// swallowed; the cached page is left untouched.
pub fn handle_mutation(action: &str, result: TransportResult<()>) -> Completion {
    match result {
        Ok(()) => Completion::Applied,
        Err(error) if error.is_unauthorized() => Completion::Expired,
        Err(error) => {
            tracing::warn!(action, kind = %error.kind, error = %error, "history mutation failed");
            Completion::Failed
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use inquiro_core::chat::HistoryEntry;
    use inquiro_core::transport::TransportError;

    use super::*;

    fn page(ids: &[u64], page_number: u32, total_pages: u32) -> Page {
        Page {
            items: ids
                .iter()
                .map(|id| HistoryEntry {
                    id: HistoryId::from(*id),
                    query: format!("q{id}"),
                    response: format!("r{id}"),
                    created_at: Utc::now(),
                })
                .collect(),
            page_number,
            total_pages,
        }
    }

    #[test]
    fn test_page_is_replaced_wholesale() {
        let mut history = HistoryState::default();
        handle_page_loaded(&mut history, Ok(page(&[1, 2, 3], 1, 2)));
        handle_page_loaded(&mut history, Ok(page(&[4], 2, 2)));

        assert_eq!(history.entries().len(), 1);
        assert_eq!(history.page_number(), 2);
        assert!(history.page().contains(&HistoryId::from(4)));
    }

    #[test]
    fn test_failed_load_keeps_previous_page() {
        let mut history = HistoryState::default();
        handle_page_loaded(&mut history, Ok(page(&[1], 1, 1)));

        let outcome = handle_page_loaded(&mut history, Err(TransportError::network("down")));

        assert_eq!(outcome, Completion::Failed);
        assert_eq!(history.entries().len(), 1);
    }

    #[test]
    fn test_target_page_follows_pending_load() {
        let mut history = HistoryState::default();
        let mut seq = TaskSeq::default();
        handle_page_loaded(&mut history, Ok(page(&[1], 1, 5)));

        load_page(&mut history, &mut seq, 2, 20);
        assert_eq!(history.page_number(), 1);
        assert_eq!(history.target_page(), 2);

        handle_page_loaded(&mut history, Err(TransportError::network("down")));
        assert_eq!(history.target_page(), 1);

        load_page(&mut history, &mut seq, 3, 20);
        handle_page_loaded(&mut history, Ok(page(&[7], 3, 5)));
        assert_eq!(history.target_page(), 3);
    }

    #[test]
    fn test_load_page_floors_at_one() {
        let mut history = HistoryState::default();
        let mut seq = TaskSeq::default();
        let effects = load_page(&mut history, &mut seq, 0, 20);
        assert!(matches!(
            effects.as_slice(),
            [SessionEffect::LoadHistoryPage { page: 1, .. }]
        ));
        assert!(history.is_loading());
    }

    #[test]
    fn test_mutation_unauthorized_is_expired() {
        assert_eq!(
            handle_mutation("delete", Err(TransportError::http_status(401, ""))),
            Completion::Expired
        );
        assert_eq!(
            handle_mutation("delete", Err(TransportError::http_status(404, ""))),
            Completion::Failed
        );
    }
}
