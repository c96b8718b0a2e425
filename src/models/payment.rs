use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;

use super::PaymentCategory;

/// Where a payment record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentOrigin {
    Manual,
    Sms,
}

impl PaymentOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Sms => "sms",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "sms" => Self::Sms,
            _ => Self::Manual,
        }
    }
}

impl std::fmt::Display for PaymentOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which payments a listing should include.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentFilter {
    All,
    Manual,
    Sms,
}

impl PaymentFilter {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "all" => Some(Self::All),
            "manual" => Some(Self::Manual),
            "sms" => Some(Self::Sms),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Payment {
    pub id: String,
    pub amount: Decimal,
    pub description: String,
    pub category: PaymentCategory,
    /// RFC 3339 / ISO-8601 timestamp, UTC, millisecond precision.
    pub date: String,
    pub origin: PaymentOrigin,
    pub is_from_sms: bool,
}

impl Payment {
    pub fn new_manual(
        amount: Decimal,
        description: String,
        category: PaymentCategory,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            amount,
            description,
            category,
            date: iso_date(at),
            origin: PaymentOrigin::Manual,
            is_from_sms: false,
        }
    }

    /// Build a payment detected in an SMS received at `timestamp_ms`.
    pub fn from_sms(
        amount: Decimal,
        description: String,
        category: PaymentCategory,
        timestamp_ms: i64,
    ) -> Self {
        let at = DateTime::<Utc>::from_timestamp_millis(timestamp_ms).unwrap_or_default();
        Self {
            id: format!("sms_{}", uuid::Uuid::new_v4().simple()),
            amount,
            description,
            category,
            date: iso_date(at),
            origin: PaymentOrigin::Sms,
            is_from_sms: true,
        }
    }

    /// The calendar day part of `date`, or the raw value if it is not RFC 3339.
    pub fn day(&self) -> String {
        DateTime::parse_from_rfc3339(&self.date)
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|_| self.date.clone())
    }
}

fn iso_date(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}
