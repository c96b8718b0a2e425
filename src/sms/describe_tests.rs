use super::*;
use rust_decimal_macros::dec;

fn describe(body: &str, sender: &str) -> String {
    DescriptionGenerator::new().describe(body, sender, dec!(250))
}

#[test]
fn test_all_patterns_compile() {
    assert_eq!(
        DescriptionGenerator::new().merchant_patterns.len(),
        MERCHANT_PATTERNS.len()
    );
}

#[test]
fn test_for_merchant_keeps_original_case() {
    assert_eq!(
        describe(
            "Rs.250 debited from your HDFC account for Swiggy order",
            "HD-HDFCBK"
        ),
        "Payment to Swiggy order"
    );
}

#[test]
fn test_to_merchant_at_end_of_text() {
    assert_eq!(
        describe("INR 99.00 is paid to Netflix", "AX-PAYTM"),
        "Payment to Netflix"
    );
}

#[test]
fn test_at_merchant_stops_before_on() {
    assert_eq!(
        describe("Rs.500 spent at Big Bazaar on 12-01-2024", "VM-ICICIB"),
        "Payment to Big Bazaar"
    );
}

#[test]
fn test_merchant_stops_before_via_and_period() {
    assert_eq!(
        describe("Paid Rs.40 to Chai Point via UPI", "X"),
        "Payment to Chai Point"
    );
    assert_eq!(
        describe("Rs.40 paid to Chai Point. Avl bal Rs.100", "X"),
        "Payment to Chai Point"
    );
}

#[test]
fn test_at_is_tried_before_to() {
    assert_eq!(
        describe("Rs.99 sent to wallet at Croma Store", "X"),
        "Payment to Croma Store"
    );
}

#[test]
fn test_short_merchant_falls_back_to_sender() {
    // "ABC" is too short to be a merchant name
    assert_eq!(
        describe("Rs.10 paid to ABC", "HD-HDFCBK"),
        "Payment via HDHDFCBK"
    );
}

#[test]
fn test_no_merchant_uses_cleaned_sender() {
    assert_eq!(describe("Rs.250 debited", "HD-HDFCBK"), "Payment via HDHDFCBK");
    assert_eq!(describe("Rs.250 debited", "AX-PAYTM"), "Payment via AXPAYTM");
}

#[test]
fn test_word_boundary_on_phrases() {
    // "flat 20" must not read as "at 20"
    assert_eq!(describe("flat 20 off. Rs.250 debited", "AX-PAYTM"), "Payment via AXPAYTM");
}

#[test]
fn test_to_inside_a_word_is_not_a_merchant() {
    assert_eq!(
        describe("Rs.500 transferred into Savings account", "HD-HDFCBK"),
        "Payment via HDHDFCBK"
    );
}

#[test]
fn test_generic_fallback() {
    let gen = DescriptionGenerator::new();
    assert_eq!(gen.describe("Rs.250 debited", "", dec!(250)), "SMS Payment ₹250.00");
    assert_eq!(gen.describe("Rs.5 debited", "S-M", dec!(5.5)), "SMS Payment ₹5.50");
    assert_eq!(gen.describe("Rs.5 debited", "SMS", dec!(5)), "SMS Payment ₹5.00");
}

#[test]
fn test_never_empty() {
    let gen = DescriptionGenerator::new();
    for (body, sender) in [("", ""), (".", "-"), ("to .", "--")] {
        assert!(!gen.describe(body, sender, dec!(1)).is_empty());
    }
}
