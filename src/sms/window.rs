//! Persisted "monitoring started at" cutoff.

use tracing::warn;

use crate::store::SettingsStore;

use super::error::SmsError;

pub(crate) const MONITORING_STARTED_KEY: &str = "sms_monitoring_started_at";

/// Messages received before `cutoff()` are never turned into payments, so
/// switching monitoring on does not import the whole inbox backlog.
#[derive(Debug, Default)]
pub(crate) struct MonitoringWindow {
    started_at: Option<i64>,
}

impl MonitoringWindow {
    pub(crate) fn cutoff(&self) -> Option<i64> {
        self.started_at
    }

    /// True when a cutoff is set and `timestamp_ms` is strictly before it.
    pub(crate) fn is_before_cutoff(&self, timestamp_ms: i64) -> bool {
        self.started_at.is_some_and(|cutoff| timestamp_ms < cutoff)
    }

    pub(crate) fn load<S: SettingsStore + ?Sized>(
        &mut self,
        store: &S,
    ) -> Result<Option<i64>, SmsError> {
        let raw = store
            .get_setting(MONITORING_STARTED_KEY)
            .map_err(|e| SmsError::persistence("monitoring window", e))?;
        self.started_at = raw.and_then(|v| match v.trim().parse::<i64>() {
            Ok(ts) => Some(ts),
            Err(_) => {
                warn!(value = %v, "ignoring unreadable monitoring window");
                None
            }
        });
        Ok(self.started_at)
    }

    /// Set the cutoff to `now_ms` unless one is already set. Returns the
    /// cutoff in effect. An existing cutoff is left untouched.
    pub(crate) fn start<S: SettingsStore + ?Sized>(
        &mut self,
        store: &S,
        now_ms: i64,
    ) -> Result<i64, SmsError> {
        if let Some(cutoff) = self.started_at {
            return Ok(cutoff);
        }
        self.started_at = Some(now_ms);
        store
            .set_setting(MONITORING_STARTED_KEY, &now_ms.to_string())
            .map_err(|e| SmsError::persistence("monitoring window", e))?;
        Ok(now_ms)
    }

    pub(crate) fn stop<S: SettingsStore + ?Sized>(&mut self, store: &S) -> Result<(), SmsError> {
        self.started_at = None;
        store
            .remove_setting(MONITORING_STARTED_KEY)
            .map_err(|e| SmsError::persistence("monitoring window", e))
    }
}

#[cfg(test)]
#[path = "window_tests.rs"]
mod tests;
