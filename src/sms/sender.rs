//! Trusted sender check for bank / wallet / payment-rail SMS headers.

/// Institution fragments looked for in the normalized sender id. Plain
/// substring containment, so a fragment inside an unrelated sender
/// (e.g. "BOB" in "BOBSPIZZA") is accepted too.
const TRUSTED_SENDER_FRAGMENTS: &[&str] = &[
    // banks
    "HDFC", "ICICI", "SBI", "AXIS", "KOTAK", "PNB", "BOB", "CANARA", "UNION", "IDFC", "INDUS",
    "YESBNK", "FEDERAL", "RBL", "CITI", "HSBC", "SCB", "AIRBNK",
    // card networks
    "AMEX", "VISA", "MASTERCARD", "RUPAY",
    // upi apps and wallets
    "PAYTM", "PHONEPE", "GPAY", "GOOGLEPAY", "BHIM", "UPI", "AMAZONPAY", "MOBIKWIK", "FREECHARGE",
];

/// Upper-cased sender with every non-alphanumeric character removed.
pub(crate) fn normalize_sender(address: &str) -> String {
    address
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

pub(crate) fn is_trusted_sender(address: &str) -> bool {
    let normalized = normalize_sender(address);
    if normalized.is_empty() {
        return false;
    }
    TRUSTED_SENDER_FRAGMENTS
        .iter()
        .any(|fragment| normalized.contains(fragment))
}

#[cfg(test)]
#[path = "sender_tests.rs"]
mod tests;
