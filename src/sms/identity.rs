//! Stable per-message identifiers used as dedup keys.
//!
//! The hash is a 31-multiplier polynomial over the UTF-16 code units of
//! `"{sender}_{timestamp}_{body}"`, reduced modulo 1e9+7, which keeps ids
//! identical to those written by the mobile app's ledger. It is not
//! collision resistant; the timestamp suffix narrows any collision to two
//! messages received in the same millisecond.

const HASH_MULTIPLIER: u64 = 31;
const HASH_MODULUS: u64 = 1_000_000_007;

pub(crate) fn message_identity(sender: &str, timestamp_ms: i64, body: &str) -> String {
    let content = format!("{sender}_{timestamp_ms}_{body}");
    let hash = content.encode_utf16().fold(0u64, |hash, unit| {
        (hash * HASH_MULTIPLIER + u64::from(unit)) % HASH_MODULUS
    });
    format!("sms_{}_{timestamp_ms}", to_base36(hash))
}

fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}

#[cfg(test)]
#[path = "identity_tests.rs"]
mod tests;
