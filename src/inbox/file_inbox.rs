use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use super::{InboxFilter, MessageInbox, PermissionGate};
use crate::models::IncomingMessage;

/// Inbox backed by a JSON array of `{address, body, date}` objects, the
/// shape of an Android SMS export. Re-read on every `list` so appended
/// messages show up on the next poll.
pub(crate) struct FileInbox {
    path: PathBuf,
}

impl FileInbox {
    pub(crate) fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }
}

impl MessageInbox for FileInbox {
    fn list(&self, filter: &InboxFilter) -> Result<Vec<IncomingMessage>> {
        let raw = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read inbox: {}", self.path.display()))?;
        let mut messages: Vec<IncomingMessage> = serde_json::from_str(&raw)
            .with_context(|| format!("Malformed inbox file: {}", self.path.display()))?;

        messages.sort_by(|a, b| b.timestamp_ms.cmp(&a.timestamp_ms));
        messages.truncate(filter.max_count);
        Ok(messages)
    }
}

impl PermissionGate for FileInbox {
    fn request_read_access(&self) -> bool {
        std::fs::File::open(&self.path).is_ok()
    }
}

#[cfg(test)]
#[path = "file_inbox_tests.rs"]
mod tests;
