use anyhow::Result;

use crate::models::Payment;

/// String key-value persistence used for the enabled flag, the processed
/// message ledger and the monitoring window.
pub(crate) trait SettingsStore {
    fn get_setting(&self, key: &str) -> Result<Option<String>>;
    fn set_setting(&self, key: &str, value: &str) -> Result<()>;
    fn remove_setting(&self, key: &str) -> Result<()>;
}

/// Append-only view of the payment store. Not idempotent by itself; the
/// SMS pipeline dedups before calling `create_payment`.
pub(crate) trait PaymentStore {
    fn create_payment(&self, payment: &Payment) -> Result<()>;
}

pub(crate) trait Store: SettingsStore + PaymentStore {}

impl<T: SettingsStore + PaymentStore> Store for T {}
