//! Polling loop that turns new bank SMS into payments.
//!
//! Each tick takes `&mut self`, so two ticks can never overlap; the ledger
//! dedup relies on that.

use tracing::{debug, info, warn};

use crate::config::MonitorConfig;
use crate::inbox::{Clock, InboxFilter, MessageInbox, PermissionGate};
use crate::models::{IncomingMessage, Payment};
use crate::store::Store;

use super::error::SmsError;
use super::identity::message_identity;
use super::ledger::{ProcessedLedger, PROCESSED_SMS_KEY};
use super::parse::{ParseOutcome, SmsParser};
use super::window::MonitoringWindow;

pub(crate) const PARSING_ENABLED_KEY: &str = "sms_parsing_enabled";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MonitorState {
    Stopped,
    Polling,
}

impl std::fmt::Display for MonitorState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stopped => write!(f, "stopped"),
            Self::Polling => write!(f, "polling"),
        }
    }
}

/// What one pass over the inbox did.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct TickSummary {
    pub(crate) fetched: usize,
    pub(crate) created: Vec<Payment>,
    pub(crate) before_window: usize,
    pub(crate) already_processed: usize,
    pub(crate) untrusted: usize,
    pub(crate) not_payment: usize,
    pub(crate) write_failed: usize,
}

/// Snapshot of monitor state for diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct DebugReport {
    pub(crate) state: MonitorState,
    pub(crate) parsing_enabled: bool,
    pub(crate) window_cutoff: Option<i64>,
    pub(crate) storage_key: &'static str,
    pub(crate) in_memory: usize,
    pub(crate) persisted: Option<usize>,
    pub(crate) sample_ids: Vec<String>,
}

impl std::fmt::Display for DebugReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "State:               {}", self.state)?;
        writeln!(f, "Parsing enabled:     {}", self.parsing_enabled)?;
        match self.window_cutoff {
            Some(ts) => writeln!(f, "Monitoring since:    {}", format_epoch_ms(ts))?,
            None => writeln!(f, "Monitoring since:    (not set)")?,
        }
        writeln!(f, "Ledger storage key:  {}", self.storage_key)?;
        writeln!(f, "Processed in memory: {}", self.in_memory)?;
        match self.persisted {
            Some(n) => writeln!(f, "Processed in store:  {n}")?,
            None => writeln!(f, "Processed in store:  (unreadable)")?,
        }
        if !self.sample_ids.is_empty() {
            writeln!(f, "Sample ids:")?;
            for (i, id) in self.sample_ids.iter().enumerate() {
                writeln!(f, "  {}. {id}", i + 1)?;
            }
        }
        Ok(())
    }
}

pub(crate) fn format_epoch_ms(ts: i64) -> String {
    chrono::DateTime::<chrono::Utc>::from_timestamp_millis(ts)
        .map(|d| d.to_rfc3339())
        .unwrap_or_else(|| ts.to_string())
}

/// Owns the pipeline state (ledger, window, polling flag). Call
/// `initialize` once before anything else.
pub(crate) struct SmsMonitor<'a> {
    store: &'a dyn Store,
    inbox: &'a dyn MessageInbox,
    permissions: &'a dyn PermissionGate,
    clock: &'a dyn Clock,
    config: MonitorConfig,
    parser: SmsParser,
    ledger: ProcessedLedger,
    /// Set while the in-memory ledger holds ids the last write failed to save.
    ledger_unsaved: bool,
    window: MonitoringWindow,
    /// Set while the in-memory cutoff could not be saved.
    window_unsaved: bool,
    state: MonitorState,
}

impl<'a> SmsMonitor<'a> {
    pub(crate) fn new(
        store: &'a dyn Store,
        inbox: &'a dyn MessageInbox,
        permissions: &'a dyn PermissionGate,
        clock: &'a dyn Clock,
        config: MonitorConfig,
    ) -> Self {
        Self {
            store,
            inbox,
            permissions,
            clock,
            ledger: ProcessedLedger::new(config.ledger_capacity),
            ledger_unsaved: false,
            config,
            parser: SmsParser::new(),
            window: MonitoringWindow::default(),
            window_unsaved: false,
            state: MonitorState::Stopped,
        }
    }

    pub(crate) fn state(&self) -> MonitorState {
        self.state
    }

    pub(crate) fn ledger(&self) -> &ProcessedLedger {
        &self.ledger
    }

    pub(crate) fn window_cutoff(&self) -> Option<i64> {
        self.window.cutoff()
    }

    /// Load the ledger and the monitoring window from storage.
    pub(crate) fn hydrate(&mut self) {
        self.load_ledger();
        if let Err(e) = self.window.load(self.store) {
            warn!(error = %e, "monitoring window unavailable");
        }
    }

    /// `hydrate`, then resume polling if parsing was left enabled.
    pub(crate) fn initialize(&mut self) {
        self.hydrate();
        if self.is_parsing_enabled() {
            if let Err(e) = self.start_polling() {
                warn!(error = %e, "SMS parsing is enabled but monitoring could not start");
            }
        }
    }

    pub(crate) fn is_parsing_enabled(&self) -> bool {
        self.read_enabled_flag().unwrap_or_else(|e| {
            warn!(error = %e, "could not read SMS parsing flag");
            false
        })
    }

    /// Returns false when enabling was refused (no read permission) or the
    /// flag could not be saved.
    pub(crate) fn set_parsing_enabled(&mut self, enabled: bool) -> bool {
        if enabled && !self.permissions.request_read_access() {
            warn!(error = %SmsError::PermissionDenied, "SMS parsing stays off");
            return false;
        }

        let value = if enabled { "true" } else { "false" };
        if let Err(e) = self.store.set_setting(PARSING_ENABLED_KEY, value) {
            let err = SmsError::persistence("SMS parsing flag", e);
            warn!(error = %err, "SMS parsing setting not changed");
            return false;
        }

        if enabled {
            self.enter_polling();
        } else {
            self.stop_polling();
        }
        true
    }

    /// `Stopped -> Polling`, after checking read permission.
    pub(crate) fn start_polling(&mut self) -> Result<(), SmsError> {
        if self.state == MonitorState::Polling {
            return Ok(());
        }
        if !self.permissions.request_read_access() {
            return Err(SmsError::PermissionDenied);
        }
        self.enter_polling();
        Ok(())
    }

    /// `Polling -> Stopped`; clears the monitoring window.
    pub(crate) fn stop_polling(&mut self) {
        self.state = MonitorState::Stopped;
        self.window_unsaved = false;
        if let Err(e) = self.window.stop(self.store) {
            warn!(error = %e, "monitoring window not cleared in storage");
        }
        info!("SMS monitoring stopped");
    }

    /// One polling cycle. `Ok(None)` when not polling.
    pub(crate) fn tick(&mut self) -> Result<Option<TickSummary>, SmsError> {
        if self.state != MonitorState::Polling {
            return Ok(None);
        }
        self.sync_from_store();
        self.check_inbox(self.config.batch_size).map(Some)
    }

    /// Poll until parsing is disabled (or `max_ticks` ticks have run),
    /// sleeping `poll_interval` between ticks. Returns the number of ticks.
    pub(crate) fn run(&mut self, max_ticks: Option<u64>) -> u64 {
        let mut ticks = 0;
        loop {
            self.refresh_enabled();
            if self.state != MonitorState::Polling {
                break;
            }

            match self.tick() {
                Ok(Some(summary)) => {
                    debug!(created = summary.created.len(), "tick finished");
                }
                Ok(None) => {}
                Err(e) => warn!(error = %e, "SMS check failed, retrying next interval"),
            }

            ticks += 1;
            if max_ticks.is_some_and(|max| ticks >= max) {
                break;
            }
            std::thread::sleep(self.config.poll_interval);
        }
        ticks
    }

    /// Manual one-off check of the most recent messages, whatever the state.
    pub(crate) fn force_check_recent(&mut self) -> Result<TickSummary, SmsError> {
        if !self.permissions.request_read_access() {
            return Err(SmsError::PermissionDenied);
        }
        self.sync_from_store();
        self.check_inbox(self.config.force_check_batch_size)
    }

    pub(crate) fn clear_ledger(&mut self) -> Result<(), SmsError> {
        self.ledger.clear(self.store)?;
        self.ledger_unsaved = false;
        info!("cleared processed SMS ledger");
        Ok(())
    }

    /// Clear the cutoff. While polling it is immediately re-anchored at the
    /// current time, so the backlog stays excluded.
    pub(crate) fn clear_window(&mut self) -> Result<(), SmsError> {
        self.window.stop(self.store)?;
        self.window_unsaved = false;
        if self.state == MonitorState::Polling {
            self.window.start(self.store, self.clock.now_ms())?;
        }
        info!(cutoff = ?self.window.cutoff(), "monitoring window reset");
        Ok(())
    }

    pub(crate) fn debug_dump(&self) -> DebugReport {
        DebugReport {
            state: self.state,
            parsing_enabled: self.is_parsing_enabled(),
            window_cutoff: self.window.cutoff(),
            storage_key: PROCESSED_SMS_KEY,
            in_memory: self.ledger.len(),
            persisted: ProcessedLedger::persisted_len(self.store).ok(),
            sample_ids: self.ledger.iter().take(5).map(str::to_string).collect(),
        }
    }

    fn enter_polling(&mut self) {
        if self.ledger.is_empty() {
            self.load_ledger();
        }
        match self.window.start(self.store, self.clock.now_ms()) {
            Ok(cutoff) => info!(cutoff, "SMS monitoring started"),
            Err(e) => {
                self.window_unsaved = true;
                warn!(error = %e, "SMS monitoring started with an unsaved window");
            }
        }
        self.state = MonitorState::Polling;
    }

    fn read_enabled_flag(&self) -> Result<bool, SmsError> {
        let value = self
            .store
            .get_setting(PARSING_ENABLED_KEY)
            .map_err(|e| SmsError::persistence("SMS parsing flag", e))?;
        Ok(value.as_deref() == Some("true"))
    }

    /// Follow the persisted flag, which another process may have flipped.
    fn refresh_enabled(&mut self) {
        match self.read_enabled_flag() {
            Ok(false) if self.state == MonitorState::Polling => self.stop_polling(),
            Ok(_) => {}
            Err(e) => warn!(error = %e, "keeping current monitoring state"),
        }
    }

    fn load_ledger(&mut self) {
        self.ledger_unsaved = false;
        match self.ledger.load(self.store) {
            Ok(count) => debug!(count, "loaded processed SMS ids"),
            Err(e) => warn!(error = %e, "starting with an empty processed SMS ledger"),
        }
    }

    /// Re-read ledger and window before touching the inbox, so ids and
    /// cutoffs written by another process are honoured.
    fn sync_from_store(&mut self) {
        let mut fresh = ProcessedLedger::new(self.config.ledger_capacity);
        match fresh.load(self.store) {
            Ok(count) => {
                if self.ledger_unsaved {
                    fresh.extend_from(&self.ledger);
                }
                debug!(count, "re-read processed SMS ids");
                self.ledger = fresh;
            }
            Err(e) => warn!(error = %e, "using in-memory processed SMS ledger"),
        }

        if !self.window_unsaved {
            if let Err(e) = self.window.load(self.store) {
                warn!(error = %e, "using in-memory monitoring window");
                return;
            }
        }
        if self.state == MonitorState::Polling && self.window.cutoff().is_none() {
            match self.window.start(self.store, self.clock.now_ms()) {
                Ok(cutoff) => info!(cutoff, "monitoring window re-anchored"),
                Err(e) => {
                    self.window_unsaved = true;
                    warn!(error = %e, "monitoring window re-anchored but not saved");
                }
            }
        }
    }

    fn check_inbox(&mut self, max_count: usize) -> Result<TickSummary, SmsError> {
        let messages = self
            .inbox
            .list(&InboxFilter { max_count })
            .map_err(SmsError::InboxRead)?;

        let mut summary = TickSummary {
            fetched: messages.len(),
            ..TickSummary::default()
        };
        for message in &messages {
            self.process_message(message, &mut summary);
        }

        info!(
            fetched = summary.fetched,
            created = summary.created.len(),
            already_processed = summary.already_processed,
            before_window = summary.before_window,
            rejected = summary.untrusted + summary.not_payment,
            write_failed = summary.write_failed,
            "SMS check complete"
        );
        Ok(summary)
    }

    fn process_message(&mut self, message: &IncomingMessage, summary: &mut TickSummary) {
        let sms_id = message_identity(&message.sender, message.timestamp_ms, &message.body);

        if self.window.is_before_cutoff(message.timestamp_ms) {
            debug!(%sms_id, "older than monitoring window, skipping");
            summary.before_window += 1;
            return;
        }
        if self.ledger.is_processed(&sms_id) {
            debug!(%sms_id, "already processed, skipping");
            summary.already_processed += 1;
            return;
        }

        let payment = match self.parser.parse(message) {
            ParseOutcome::Payment(payment) => payment,
            ParseOutcome::UntrustedSender => {
                debug!(%sms_id, sender = %message.sender, "untrusted sender");
                summary.untrusted += 1;
                return;
            }
            ParseOutcome::NoPaymentKeyword | ParseOutcome::NoAmount => {
                debug!(%sms_id, preview = %message.preview(), "no payment found");
                summary.not_payment += 1;
                return;
            }
        };

        if let Err(cause) = self.store.create_payment(&payment) {
            let err = SmsError::PaymentWrite {
                payment_id: payment.id.clone(),
                cause,
            };
            warn!(%sms_id, error = %err, "message left unprocessed for retry");
            summary.write_failed += 1;
            return;
        }
        info!(
            %sms_id,
            amount = %payment.amount,
            category = %payment.category,
            description = %payment.description,
            "added payment from SMS"
        );

        let marked = self.ledger.mark_processed(&sms_id, self.store);
        self.ledger_unsaved = marked.is_err();
        if let Err(e) = marked {
            warn!(%sms_id, error = %e, "processed SMS id kept in memory only");
        }
        summary.created.push(payment);
    }
}

#[cfg(test)]
#[path = "monitor_tests.rs"]
mod tests;
