//! Short human-readable labels for detected payments.

use regex::Regex;
use rust_decimal::Decimal;

/// "at X", "to X", "for X", each ending before " on", " via", a period or
/// the end of the text. Tried in this order.
const MERCHANT_PATTERNS: &[&str] = &[
    r"(?i)\bat\s+([^.]+?)(?:\s+on|\s+via|\.|$)",
    r"(?i)\bto\s+([^.]+?)(?:\s+on|\s+via|\.|$)",
    r"(?i)\bfor\s+([^.]+?)(?:\s+on|\s+via|\.|$)",
];

const MIN_MERCHANT_CHARS: usize = 4;
const MIN_SENDER_CHARS: usize = 3;

pub(crate) struct DescriptionGenerator {
    merchant_patterns: Vec<Regex>,
}

impl DescriptionGenerator {
    pub(crate) fn new() -> Self {
        let merchant_patterns = MERCHANT_PATTERNS
            .iter()
            .filter_map(|p| Regex::new(p).ok())
            .collect();
        Self { merchant_patterns }
    }

    /// Never empty. Prefers the merchant named in the body, then the sender,
    /// then a generic amount label.
    pub(crate) fn describe(&self, body: &str, sender: &str, amount: Decimal) -> String {
        if let Some(merchant) = self.extract_merchant(body) {
            return format!("Payment to {merchant}");
        }

        let sender = clean_sender(sender);
        if sender.chars().count() >= MIN_SENDER_CHARS && sender != "SMS" {
            return format!("Payment via {sender}");
        }

        format!("SMS Payment ₹{amount:.2}")
    }

    fn extract_merchant<'a>(&self, body: &'a str) -> Option<&'a str> {
        let candidate = self
            .merchant_patterns
            .iter()
            .find_map(|re| re.captures(body))?
            .get(1)?
            .as_str()
            .trim();
        (candidate.chars().count() >= MIN_MERCHANT_CHARS).then_some(candidate)
    }
}

impl Default for DescriptionGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Sender with hyphens and every other non-alphanumeric character removed.
fn clean_sender(sender: &str) -> String {
    sender.chars().filter(|c| c.is_alphanumeric()).collect()
}

#[cfg(test)]
#[path = "describe_tests.rs"]
mod tests;
