//! Session effect types.
//!
//! Effects are commands returned by the reducer that the runtime executes.
//! They represent I/O and timer spawning only, so the reducer never touches
//! the transport or the clock directly.
//!
//! Cancellation is initiated from the reducer via `SessionEffect::CancelDebounce`;
//! the runtime just calls `cancel()` on the token.

use std::time::Duration;

use inquiro_core::chat::HistoryId;
use tokio_util::sync::CancellationToken;

use crate::common::TaskId;

/// Effects returned by the reducer for the runtime to execute.
#[derive(Debug)]
pub enum SessionEffect {
    /// Send one chat message. `epoch` tags the transcript it belongs to.
    SendChat {
        task: TaskId,
        message: String,
        epoch: u64,
    },

    /// Fetch one page of the browse list.
    LoadHistoryPage {
        task: TaskId,
        page: u32,
        page_size: u32,
    },

    DeleteHistory {
        task: TaskId,
        id: HistoryId,
    },

    ClearHistory {
        task: TaskId,
    },

    /// Arm the search debounce timer.
    ScheduleSearch {
        generation: u64,
        delay: Duration,
        cancel: CancellationToken,
    },

    /// Issue a search request for the trimmed query.
    SearchHistory {
        task: TaskId,
        query: String,
        page_size: u32,
    },

    /// Stop a pending debounce timer.
    CancelDebounce {
        token: CancellationToken,
    },
}
