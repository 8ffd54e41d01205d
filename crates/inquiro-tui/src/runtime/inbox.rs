//! Inbox channel types.
//!
//! Spawned requests and timers send their result events here; the runtime
//! feeds them through the reducer in arrival order.

use tokio::sync::mpsc;

use crate::events::SessionEvent;

pub type SessionEventSender = mpsc::UnboundedSender<SessionEvent>;
pub type SessionEventReceiver = mpsc::UnboundedReceiver<SessionEvent>;
