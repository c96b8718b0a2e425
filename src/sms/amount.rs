//! Amount extraction from rupee-formatted SMS bodies.

use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::debug;

/// Words one of which must appear before a body is treated as a payment.
const PAYMENT_KEYWORDS: &[&str] = &[
    "debited",
    "withdrawn",
    "paid",
    "spent",
    "transaction",
    "upi",
    "payment",
    "purchase",
    "charged",
    "deducted",
    "transfer",
];

/// Currency marker when it precedes the number; the word boundary keeps
/// "hours 5" from reading as "rs 5".
const CURRENCY_PREFIX: &str = r"(?:\brs\.?|\binr|₹)";
const CURRENCY_SUFFIX: &str = r"(?:rs\.?|inr|₹)";
/// Must start with a digit so a lone comma is never captured.
const NUMBER: &str = r"([0-9][0-9,]*(?:\.[0-9]{1,2})?)";

/// Most explicit first. The first pattern that matches decides the amount,
/// even if a later one would have read a different number.
fn amount_patterns() -> Vec<String> {
    vec![
        format!(r"{CURRENCY_PREFIX}\s*{NUMBER}"),
        format!(r"{NUMBER}\s*{CURRENCY_SUFFIX}"),
        format!(r"amount\s*:?\s*{CURRENCY_PREFIX}?\s*{NUMBER}"),
        format!(r"(?:debited|withdrawn|paid|spent)\s*{CURRENCY_PREFIX}?\s*{NUMBER}"),
        format!(r"\binr\s*{NUMBER}\s*is\s*paid"),
        format!(r"{NUMBER}\s*(?:is\s*paid|paid)"),
    ]
}

/// True when the body mentions any payment keyword.
pub(crate) fn looks_like_payment(body: &str) -> bool {
    let body = body.to_lowercase();
    PAYMENT_KEYWORDS.iter().any(|k| body.contains(k))
}

pub(crate) struct AmountExtractor {
    patterns: Vec<Regex>,
}

impl AmountExtractor {
    pub(crate) fn new() -> Self {
        let patterns = amount_patterns()
            .iter()
            .filter_map(|p| Regex::new(p).ok())
            .collect();
        Self { patterns }
    }

    /// Amount of the first matching pattern, or `None` when nothing matches
    /// or the matched value is not positive.
    pub(crate) fn extract(&self, body: &str) -> Option<Decimal> {
        let body = body.to_lowercase();
        let captured = self
            .patterns
            .iter()
            .find_map(|re| re.captures(&body))?
            .get(1)?
            .as_str()
            .replace(',', "");

        let amount = match Decimal::from_str(&captured) {
            Ok(amount) => amount,
            Err(e) => {
                debug!(value = %captured, error = %e, "amount outside decimal range");
                return None;
            }
        };
        (amount > Decimal::ZERO).then_some(amount)
    }
}

impl Default for AmountExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "amount_tests.rs"]
mod tests;
