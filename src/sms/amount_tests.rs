#![allow(clippy::unwrap_used)]

use super::*;
use rust_decimal_macros::dec;

fn extract(body: &str) -> Option<Decimal> {
    AmountExtractor::new().extract(body)
}

#[test]
fn test_all_patterns_compile() {
    assert_eq!(AmountExtractor::new().patterns.len(), amount_patterns().len());
}

// ── currency-marked amounts ───────────────────────────────────

#[test]
fn test_rupee_symbol_prefix() {
    assert_eq!(extract("₹123.45 spent on your card"), Some(dec!(123.45)));
    assert_eq!(extract("Txn of ₹ 123.45 done. Ref 99812"), Some(dec!(123.45)));
}

#[test]
fn test_rs_prefix() {
    assert_eq!(
        extract("Rs.250 debited from your HDFC account for Swiggy order"),
        Some(dec!(250))
    );
    assert_eq!(extract("Rs. 5,000 withdrawn"), Some(dec!(5000)));
    assert_eq!(extract("RS 75.5 charged"), Some(dec!(75.5)));
}

#[test]
fn test_inr_prefix() {
    assert_eq!(extract("INR 99.00 is paid to Netflix"), Some(dec!(99.00)));
}

#[test]
fn test_currency_suffix() {
    assert_eq!(extract("123.45 Rs debited from a/c"), Some(dec!(123.45)));
    assert_eq!(extract("You spent 80 INR"), Some(dec!(80)));
}

#[test]
fn test_indian_thousands_separators() {
    assert_eq!(extract("Rs 1,00,000.00 debited"), Some(dec!(100000.00)));
}

#[test]
fn test_fraction_capped_at_two_digits() {
    assert_eq!(extract("Rs.12.345 debited"), Some(dec!(12.34)));
}

// ── keyword-anchored amounts ──────────────────────────────────

#[test]
fn test_amount_label() {
    assert_eq!(extract("Amount: 1,500.50 debited"), Some(dec!(1500.50)));
    assert_eq!(extract("amount 42 deducted"), Some(dec!(42)));
}

#[test]
fn test_debited_prefix() {
    assert_eq!(extract("A/c XX12 debited 2,000 on 12-Jan"), Some(dec!(2000)));
    assert_eq!(extract("You have paid 450 to Ramesh"), Some(dec!(450)));
}

#[test]
fn test_bare_is_paid() {
    assert_eq!(extract("450 is paid to Ramesh"), Some(dec!(450)));
    assert_eq!(extract("450 paid to Ramesh"), Some(dec!(450)));
}

// ── precedence ────────────────────────────────────────────────

#[test]
fn test_currency_amount_beats_reference_number() {
    // the keyword pattern would read 998877; the currency pattern runs first
    assert_eq!(
        extract("Ref 998877 debited. Rs.150 sent to Ramesh"),
        Some(dec!(150))
    );
}

#[test]
fn test_first_pattern_wins_even_when_later_differs() {
    assert_eq!(
        extract("debited 500 for order; Rs.20 cashback credited"),
        Some(dec!(20))
    );
}

#[test]
fn test_currency_prefix_needs_word_boundary() {
    assert_eq!(extract("cleared in 2 hours 30 min"), None);
}

// ── misses ────────────────────────────────────────────────────

#[test]
fn test_otp_has_no_amount() {
    assert_eq!(extract("Your OTP is 482913"), None);
}

#[test]
fn test_zero_amount_is_none() {
    assert_eq!(extract("Rs.0 debited"), None);
    assert_eq!(extract("Rs 0.00 charged"), None);
}

#[test]
fn test_no_number_is_none() {
    assert_eq!(extract(""), None);
    assert_eq!(extract("Rs , debited"), None);
    assert_eq!(extract("payment received, thank you"), None);
}

#[test]
fn test_no_upper_bound() {
    assert_eq!(extract("Rs.9,99,99,999.99 debited"), Some(dec!(999999999.99)));
}

#[test]
fn test_amount_beyond_decimal_range_is_none() {
    assert_eq!(
        extract("Rs.1234567890123456789012345678901 debited"),
        None
    );
    assert!(extract("Rs.12345678901234567890123 debited").is_some());
}

// ── payment keyword gate ──────────────────────────────────────

#[test]
fn test_looks_like_payment() {
    assert!(looks_like_payment("Rs.250 DEBITED from a/c"));
    assert!(looks_like_payment("UPI txn successful"));
    assert!(looks_like_payment("INR 99.00 is paid to Netflix"));
    assert!(!looks_like_payment("Your OTP is 482913"));
    assert!(!looks_like_payment("Rs.500 credited to your a/c"));
    assert!(!looks_like_payment(""));
}
