use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(pub u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic id source, owned by the reducer.
#[derive(Debug, Default)]
pub struct TaskSeq {
    next: u64,
}

impl TaskSeq {
    pub fn next_id(&mut self) -> TaskId {
        self.next = self.next.wrapping_add(1);
        TaskId(self.next)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    Send,
    HistoryLoad,
    HistoryDelete,
    HistoryClear,
    Search,
}

impl TaskKind {
    /// Kinds where only the most recently issued task may apply its result.
    pub fn latest_wins(self) -> bool {
        matches!(self, TaskKind::Search | TaskKind::HistoryLoad)
    }

    pub fn label(self) -> &'static str {
        match self {
            TaskKind::Send => "send",
            TaskKind::HistoryLoad => "history_load",
            TaskKind::HistoryDelete => "history_delete",
            TaskKind::HistoryClear => "history_clear",
            TaskKind::Search => "search",
        }
    }
}

#[derive(Debug)]
pub struct TaskCompleted<E> {
    pub id: TaskId,
    pub result: E,
}

/// How a feature handled a finished request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    Failed,
    /// The backend rejected the session (HTTP 401).
    Expired,
}

/// Task lifecycle state (stored in AppState, mutated only by reducer).
///
/// `active` is the most recently issued id; `in_flight` counts every
/// request that has not reported back yet, stale ones included.
#[derive(Debug, Default, Clone)]
pub struct TaskState {
    pub active: Option<TaskId>,
    in_flight: usize,
}

impl TaskState {
    pub fn is_running(&self) -> bool {
        self.in_flight > 0
    }

    pub fn begin(&mut self, id: TaskId) {
        self.active = Some(id);
        self.in_flight += 1;
    }

    /// Accepts the completion only if `id` is still the latest issued task.
    pub fn finish_if_active(&mut self, id: TaskId) -> bool {
        self.in_flight = self.in_flight.saturating_sub(1);
        let ok = self.active == Some(id);
        if ok {
            self.active = None;
        }
        ok
    }

    /// Records a completion that is always accepted.
    pub fn finish(&mut self, id: TaskId) {
        self.in_flight = self.in_flight.saturating_sub(1);
        if self.active == Some(id) {
            self.active = None;
        }
    }

    /// Forgets the active id so its eventual completion is discarded.
    pub fn invalidate(&mut self) {
        self.active = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seq_is_monotonic() {
        let mut seq = TaskSeq::default();
        let a = seq.next_id();
        let b = seq.next_id();
        assert!(b.0 > a.0);
    }

    #[test]
    fn test_finish_if_active_rejects_superseded() {
        let mut seq = TaskSeq::default();
        let mut state = TaskState::default();
        let first = seq.next_id();
        let second = seq.next_id();
        state.begin(first);
        state.begin(second);

        assert!(!state.finish_if_active(first));
        assert!(state.is_running());
        assert!(state.finish_if_active(second));
        assert!(!state.is_running());
    }

    #[test]
    fn test_invalidate_discards_late_completion() {
        let mut state = TaskState::default();
        let id = TaskId(7);
        state.begin(id);
        state.invalidate();
        assert!(!state.finish_if_active(id));
        assert!(!state.is_running());
    }

    #[test]
    fn test_finish_counts_down() {
        let mut state = TaskState::default();
        state.begin(TaskId(1));
        state.begin(TaskId(2));
        state.finish(TaskId(1));
        assert!(state.is_running());
        assert_eq!(state.active, Some(TaskId(2)));
        state.finish(TaskId(2));
        assert!(!state.is_running());
        assert_eq!(state.active, None);
    }
}
