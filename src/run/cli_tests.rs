#![allow(clippy::unwrap_used)]

use super::*;
use crate::store::SettingsStore;
use rust_decimal_macros::dec;
use std::io::Write;

fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn inbox_file(json: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();
    file
}

fn fast_config() -> MonitorConfig {
    MonitorConfig {
        poll_interval: std::time::Duration::ZERO,
        ..MonitorConfig::default()
    }
}

// ── Argument helpers ────────────────────────────────────────────────────────

#[test]
fn test_parse_amount() {
    assert_eq!(parse_amount("250").unwrap(), dec!(250));
    assert_eq!(parse_amount("₹1,250.50").unwrap(), dec!(1250.50));
    assert!(parse_amount("0").is_err());
    assert!(parse_amount("-5").is_err());
    assert!(parse_amount("abc").is_err());
}

#[test]
fn test_parse_category_is_strict() {
    assert_eq!(parse_category("food").unwrap(), PaymentCategory::Food);
    assert_eq!(parse_category("Bills").unwrap(), PaymentCategory::Bills);
    let err = parse_category("groceries").unwrap_err().to_string();
    assert!(err.contains("Healthcare"));
}

#[test]
fn test_flag_value() {
    let a = args(&["inbox.json", "--ticks", "3"]);
    assert_eq!(flag_value(&a, "--ticks"), Some("3"));
    assert_eq!(flag_value(&a, "--date"), None);
}

#[test]
fn test_truncate() {
    assert_eq!(truncate("short", 10), "short");
    assert_eq!(truncate("abcdefghij", 5), "abcd…");
}

#[test]
fn test_shellexpand_plain_path() {
    assert_eq!(shellexpand("/tmp/x.csv"), "/tmp/x.csv");
}

// ── Commands ────────────────────────────────────────────────────────────────

#[test]
fn test_unknown_command_fails() {
    let db = Database::open_in_memory().unwrap();
    assert!(as_cli(&args(&["spendbook", "frobnicate"]), &db, &fast_config()).is_err());
}

#[test]
fn test_no_command_prints_usage() {
    let db = Database::open_in_memory().unwrap();
    assert!(as_cli(&args(&["spendbook"]), &db, &fast_config()).is_ok());
}

#[test]
fn test_add_and_delete() {
    let db = Database::open_in_memory().unwrap();
    let config = fast_config();
    as_cli(
        &args(&["spendbook", "add", "120", "food", "Lunch", "with", "team"]),
        &db,
        &config,
    )
    .unwrap();

    let payments = db.get_payments(PaymentFilter::Manual).unwrap();
    assert_eq!(payments.len(), 1);
    assert_eq!(payments[0].description, "Lunch with team");

    let id = payments[0].id.clone();
    as_cli(&args(&["spendbook", "delete", &id]), &db, &config).unwrap();
    assert_eq!(db.get_payment_count().unwrap(), 0);
    assert!(as_cli(&args(&["spendbook", "delete", &id]), &db, &config).is_err());
}

#[test]
fn test_enable_watch_disable() {
    let inbox = inbox_file(
        r#"[{"address": "HD-HDFCBK", "body": "Rs.250 debited from your HDFC account for Swiggy order", "date": 4102444800000}]"#,
    );
    let path = inbox.path().to_str().unwrap().to_string();
    let db = Database::open_in_memory().unwrap();
    let config = fast_config();

    as_cli(&args(&["spendbook", "enable", &path]), &db, &config).unwrap();
    assert_eq!(db.get_setting("sms_parsing_enabled").unwrap().as_deref(), Some("true"));

    as_cli(&args(&["spendbook", "watch", &path, "--ticks", "2"]), &db, &config).unwrap();
    assert_eq!(db.get_payments(PaymentFilter::Sms).unwrap().len(), 1);

    as_cli(&args(&["spendbook", "disable"]), &db, &config).unwrap();
    assert_eq!(db.get_setting("sms_parsing_enabled").unwrap().as_deref(), Some("false"));
    assert_eq!(db.get_setting("sms_monitoring_started_at").unwrap(), None);
    assert!(as_cli(&args(&["spendbook", "watch", &path]), &db, &config).is_err());
}

#[test]
fn test_enable_with_missing_inbox_fails() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.json");
    let db = Database::open_in_memory().unwrap();

    let result = as_cli(
        &args(&["spendbook", "enable", missing.to_str().unwrap()]),
        &db,
        &fast_config(),
    );
    assert!(result.is_err());
    assert_eq!(db.get_setting("sms_parsing_enabled").unwrap(), None);
}

#[test]
fn test_check_without_enabling() {
    let inbox = inbox_file(
        r#"[{"address": "AX-PAYTM", "body": "INR 99.00 is paid to Netflix", "date": 1705314600000}]"#,
    );
    let path = inbox.path().to_str().unwrap().to_string();
    let db = Database::open_in_memory().unwrap();

    as_cli(&args(&["spendbook", "check", &path]), &db, &fast_config()).unwrap();
    as_cli(&args(&["spendbook", "check", &path]), &db, &fast_config()).unwrap();
    assert_eq!(db.get_payment_count().unwrap(), 1);
}

#[test]
fn test_export_command() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.csv");
    let db = Database::open_in_memory().unwrap();
    let config = fast_config();
    as_cli(&args(&["spendbook", "add", "99.5", "others", "Groceries"]), &db, &config).unwrap();

    as_cli(
        &args(&["spendbook", "export", out.to_str().unwrap()]),
        &db,
        &config,
    )
    .unwrap();
    let text = std::fs::read_to_string(&out).unwrap();
    assert!(text.starts_with("Date,Amount,Category,Description,Type"));
    assert!(text.contains("99.50,Others,Groceries,manual"));
}

#[test]
fn test_payments_rejects_unknown_filter() {
    let db = Database::open_in_memory().unwrap();
    assert!(as_cli(&args(&["spendbook", "payments", "cash"]), &db, &fast_config()).is_err());
    assert!(as_cli(&args(&["spendbook", "payments", "sms"]), &db, &fast_config()).is_ok());
}
