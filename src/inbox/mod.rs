//! Device-side collaborators of the SMS monitor: the message inbox, the
//! read permission and the wall clock.

mod file_inbox;

pub(crate) use file_inbox::FileInbox;

use anyhow::Result;

use crate::models::IncomingMessage;

/// Query against the inbox; always the received-messages box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct InboxFilter {
    pub(crate) max_count: usize,
}

pub(crate) trait MessageInbox {
    /// At most `filter.max_count` messages, newest first.
    fn list(&self, filter: &InboxFilter) -> Result<Vec<IncomingMessage>>;
}

pub(crate) trait PermissionGate {
    fn request_read_access(&self) -> bool;
}

pub(crate) trait Clock {
    fn now_ms(&self) -> i64;
}

pub(crate) struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}
