//! Bounded, persisted record of messages already turned into payments.

use std::collections::{HashSet, VecDeque};

use crate::store::SettingsStore;

use super::error::SmsError;

pub(crate) const PROCESSED_SMS_KEY: &str = "processed_sms_ids";

/// Insertion-ordered set of message identities. Holds at most `capacity`
/// entries; the oldest are dropped first.
#[derive(Debug)]
pub(crate) struct ProcessedLedger {
    order: VecDeque<String>,
    ids: HashSet<String>,
    capacity: usize,
}

impl ProcessedLedger {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            order: VecDeque::new(),
            ids: HashSet::new(),
            capacity: capacity.max(1),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.order.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub(crate) fn is_processed(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Identities from oldest to newest.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Replace the in-memory set with the persisted one. On failure the
    /// ledger is left empty.
    pub(crate) fn load<S: SettingsStore + ?Sized>(&mut self, store: &S) -> Result<usize, SmsError> {
        self.reset();
        let ids = Self::read_persisted(store)?;
        for id in ids {
            self.insert(id);
        }
        Ok(self.len())
    }

    /// Remember `id` and persist. The in-memory set is updated even when the
    /// write fails.
    pub(crate) fn mark_processed<S: SettingsStore + ?Sized>(
        &mut self,
        id: &str,
        store: &S,
    ) -> Result<(), SmsError> {
        self.insert(id.to_string());
        self.persist(store)
    }

    pub(crate) fn clear<S: SettingsStore + ?Sized>(&mut self, store: &S) -> Result<(), SmsError> {
        self.reset();
        store
            .remove_setting(PROCESSED_SMS_KEY)
            .map_err(|e| SmsError::persistence("processed message ledger", e))
    }

    /// Append the ids of `other` not already present, oldest first. Not
    /// persisted.
    pub(crate) fn extend_from(&mut self, other: &ProcessedLedger) {
        for id in other.iter() {
            self.insert(id.to_string());
        }
    }

    /// Number of identities currently in storage, for diagnostics.
    pub(crate) fn persisted_len<S: SettingsStore + ?Sized>(store: &S) -> Result<usize, SmsError> {
        Ok(Self::read_persisted(store)?.len())
    }

    fn insert(&mut self, id: String) {
        if !self.ids.insert(id.clone()) {
            return;
        }
        self.order.push_back(id);
        while self.order.len() > self.capacity {
            if let Some(evicted) = self.order.pop_front() {
                self.ids.remove(&evicted);
            }
        }
    }

    fn reset(&mut self) {
        self.order.clear();
        self.ids.clear();
    }

    fn persist<S: SettingsStore + ?Sized>(&self, store: &S) -> Result<(), SmsError> {
        let json = serde_json::to_string(&self.order)
            .map_err(|e| SmsError::persistence("processed message ledger", e))?;
        store
            .set_setting(PROCESSED_SMS_KEY, &json)
            .map_err(|e| SmsError::persistence("processed message ledger", e))
    }

    fn read_persisted<S: SettingsStore + ?Sized>(store: &S) -> Result<Vec<String>, SmsError> {
        let Some(raw) = store
            .get_setting(PROCESSED_SMS_KEY)
            .map_err(|e| SmsError::persistence("processed message ledger", e))?
        else {
            return Ok(Vec::new());
        };
        serde_json::from_str(&raw).map_err(|e| SmsError::persistence("processed message ledger", e))
    }
}

#[cfg(test)]
#[path = "ledger_tests.rs"]
mod tests;
