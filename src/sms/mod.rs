//! Bank SMS to payment pipeline: trust filter, amount/category/description
//! extraction, dedup ledger, monitoring window and the polling monitor.

mod amount;
mod describe;
mod error;
mod identity;
mod ledger;
mod monitor;
mod parse;
mod sender;
mod window;

pub(crate) use identity::message_identity;
pub(crate) use monitor::{format_epoch_ms, MonitorState, SmsMonitor, TickSummary};
pub(crate) use parse::{ParseOutcome, SmsParser};
