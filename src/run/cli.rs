use anyhow::{Context, Result};
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::config::MonitorConfig;
use crate::db::Database;
use crate::inbox::{FileInbox, InboxFilter, MessageInbox, PermissionGate, SystemClock};
use crate::models::{IncomingMessage, Payment, PaymentCategory, PaymentFilter};
use crate::sms::{
    format_epoch_ms, message_identity, MonitorState, ParseOutcome, SmsMonitor, SmsParser,
    TickSummary,
};
use crate::store::PaymentStore;

pub(crate) fn as_cli(args: &[String], db: &Database, config: &MonitorConfig) -> Result<()> {
    let Some(command) = args.get(1) else {
        print_usage();
        return Ok(());
    };
    let rest = &args[2..];

    match command.as_str() {
        "enable" => cli_enable(rest, db, config),
        "disable" => cli_disable(db, config),
        "status" => cli_status(db, config),
        "watch" | "w" => cli_watch(rest, db, config),
        "check" => cli_check(rest, db, config),
        "parse" => cli_parse(rest),
        "add" => cli_add(rest, db),
        "payments" | "ls" => cli_payments(rest, db),
        "delete" | "rm" => cli_delete(rest, db),
        "export" => cli_export(rest, db),
        "clear-ledger" => cli_clear_ledger(db, config),
        "clear-window" => cli_clear_window(db, config),
        "debug" => cli_debug(db, config),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("spendbook {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("Spendbook: expense tracker that reads payments from bank SMS");
    println!();
    println!("Usage: spendbook <command>");
    println!();
    println!("SMS:");
    println!("  enable <inbox.json>           Enable SMS parsing for an exported inbox");
    println!("  disable                       Disable SMS parsing");
    println!("  status                        Show parsing state and counts");
    println!("  watch <inbox.json>            Poll the inbox until parsing is disabled");
    println!("    --ticks <n>                 Stop after n checks");
    println!("  check <inbox.json>            Check the most recent messages once");
    println!("  parse --sender <s> --body <b> Show what a single message would become");
    println!("    --date <epoch-ms>           Received time (default: now)");
    println!();
    println!("Payments:");
    println!("  add <amount> <category> <description...>");
    println!("                                Record a manual payment");
    println!("  payments [all|manual|sms]     List payments (default: all)");
    println!("  delete <id>                   Delete a payment");
    println!("  export [path]                 Export payments to CSV");
    println!();
    println!("Maintenance:");
    println!("  clear-ledger                  Forget which messages were processed");
    println!("  clear-window                  Reset the monitoring start time");
    println!("  debug                         Dump monitor state");
    println!("  --help, -h                    Show this help");
    println!("  --version, -V                 Show version");
}

/// Stand-in for commands that never read messages.
struct NoInbox;

impl MessageInbox for NoInbox {
    fn list(&self, _filter: &InboxFilter) -> Result<Vec<IncomingMessage>> {
        anyhow::bail!("No inbox attached")
    }
}

impl PermissionGate for NoInbox {
    fn request_read_access(&self) -> bool {
        false
    }
}

fn open_inbox(args: &[String], usage: &str) -> Result<FileInbox> {
    let path = args
        .first()
        .filter(|a| !a.starts_with('-'))
        .ok_or_else(|| anyhow::anyhow!("{usage}"))?;
    Ok(FileInbox::new(shellexpand(path)))
}

fn cli_enable(args: &[String], db: &Database, config: &MonitorConfig) -> Result<()> {
    let inbox = open_inbox(args, "Usage: spendbook enable <inbox.json>")?;
    let clock = SystemClock;
    let mut monitor = SmsMonitor::new(db, &inbox, &inbox, &clock, config.clone());
    monitor.initialize();

    if !monitor.set_parsing_enabled(true) {
        anyhow::bail!(
            "Could not enable SMS parsing: cannot read {}",
            inbox.path().display()
        );
    }
    println!("SMS parsing enabled");
    if let Some(cutoff) = monitor.window_cutoff() {
        println!("Messages received before {} are ignored", format_epoch_ms(cutoff));
    }
    Ok(())
}

fn cli_disable(db: &Database, config: &MonitorConfig) -> Result<()> {
    let clock = SystemClock;
    let mut monitor = SmsMonitor::new(db, &NoInbox, &NoInbox, &clock, config.clone());
    monitor.hydrate();

    if !monitor.set_parsing_enabled(false) {
        anyhow::bail!("Could not save the SMS parsing setting");
    }
    println!("SMS parsing disabled");
    Ok(())
}

fn cli_status(db: &Database, config: &MonitorConfig) -> Result<()> {
    let clock = SystemClock;
    let mut monitor = SmsMonitor::new(db, &NoInbox, &NoInbox, &clock, config.clone());
    monitor.hydrate();
    let report = monitor.debug_dump();

    println!(
        "SMS parsing:      {}",
        if report.parsing_enabled { "enabled" } else { "disabled" }
    );
    match report.window_cutoff {
        Some(cutoff) => println!("Monitoring since: {}", format_epoch_ms(cutoff)),
        None => println!("Monitoring since: -"),
    }
    println!("Processed SMS:    {}", monitor.ledger().len());
    println!("Payments:         {}", db.get_payment_count()?);
    Ok(())
}

fn cli_watch(args: &[String], db: &Database, config: &MonitorConfig) -> Result<()> {
    let inbox = open_inbox(args, "Usage: spendbook watch <inbox.json> [--ticks <n>]")?;
    let max_ticks = flag_value(args, "--ticks")
        .map(|v| {
            v.parse::<u64>()
                .with_context(|| format!("Invalid --ticks value: {v}"))
        })
        .transpose()?;

    let clock = SystemClock;
    let mut monitor = SmsMonitor::new(db, &inbox, &inbox, &clock, config.clone());
    monitor.initialize();

    if !monitor.is_parsing_enabled() {
        anyhow::bail!(
            "SMS parsing is disabled. Run: spendbook enable {}",
            inbox.path().display()
        );
    }
    if monitor.state() != MonitorState::Polling {
        anyhow::bail!("Cannot read inbox: {}", inbox.path().display());
    }

    println!(
        "Watching {} every {}s",
        inbox.path().display(),
        config.poll_interval.as_secs()
    );
    let ticks = monitor.run(max_ticks);
    println!(
        "Stopped after {ticks} checks, {} payments stored",
        db.get_payment_count()?
    );
    Ok(())
}

fn cli_check(args: &[String], db: &Database, config: &MonitorConfig) -> Result<()> {
    let inbox = open_inbox(args, "Usage: spendbook check <inbox.json>")?;
    let clock = SystemClock;
    let mut monitor = SmsMonitor::new(db, &inbox, &inbox, &clock, config.clone());
    monitor.hydrate();

    let summary = monitor.force_check_recent()?;
    print_summary(&summary);
    Ok(())
}

fn print_summary(summary: &TickSummary) {
    println!(
        "Checked {} messages: {} new payments",
        summary.fetched,
        summary.created.len()
    );
    for p in &summary.created {
        println!(
            "  {}  ₹{:>10.2}  {:<13} {}",
            p.day(),
            p.amount,
            p.category.as_str(),
            p.description
        );
    }
    let skipped = summary.already_processed + summary.before_window;
    if skipped > 0 {
        println!("Skipped {skipped} already seen or older messages");
    }
    if summary.write_failed > 0 {
        println!(
            "{} payments could not be saved and will be retried",
            summary.write_failed
        );
    }
}

fn cli_parse(args: &[String]) -> Result<()> {
    const USAGE: &str = "Usage: spendbook parse --sender <s> --body <b> [--date <epoch-ms>]";
    let sender = flag_value(args, "--sender").ok_or_else(|| anyhow::anyhow!(USAGE))?;
    let body = flag_value(args, "--body").ok_or_else(|| anyhow::anyhow!(USAGE))?;
    let date = match flag_value(args, "--date") {
        Some(v) => v
            .parse::<i64>()
            .with_context(|| format!("Invalid --date value: {v}"))?,
        None => chrono::Utc::now().timestamp_millis(),
    };

    let message = IncomingMessage::new(sender, body, date);
    println!(
        "Message id:  {}",
        message_identity(&message.sender, message.timestamp_ms, &message.body)
    );

    match SmsParser::new().parse(&message) {
        ParseOutcome::Payment(p) => {
            println!("Amount:      ₹{:.2}", p.amount);
            println!("Category:    {}", p.category);
            println!("Description: {}", p.description);
            println!("Date:        {}", p.date);
        }
        ParseOutcome::UntrustedSender => {
            println!("Not a payment: sender is not a known bank or wallet")
        }
        ParseOutcome::NoPaymentKeyword => println!("Not a payment: no payment wording"),
        ParseOutcome::NoAmount => println!("Not a payment: no amount found"),
    }
    Ok(())
}

fn cli_add(args: &[String], db: &Database) -> Result<()> {
    if args.len() < 3 {
        anyhow::bail!("Usage: spendbook add <amount> <category> <description...>");
    }
    let amount = parse_amount(&args[0])?;
    let category = parse_category(&args[1])?;
    let description = args[2..].join(" ");

    let payment = Payment::new_manual(amount, description, category, chrono::Utc::now());
    db.create_payment(&payment)?;
    println!(
        "Added ₹{:.2} {} ({}) as {}",
        payment.amount, payment.category, payment.description, payment.id
    );
    Ok(())
}

fn cli_payments(args: &[String], db: &Database) -> Result<()> {
    let filter = match args.first() {
        Some(s) => PaymentFilter::parse(s)
            .ok_or_else(|| anyhow::anyhow!("Unknown filter: {s} (expected all, manual or sms)"))?,
        None => PaymentFilter::All,
    };

    let payments = db.get_payments(filter)?;
    if payments.is_empty() {
        println!("No payments");
        return Ok(());
    }

    println!(
        "{:<10}  {:>12}  {:<13} {:<6} {:<40} ID",
        "Date", "Amount", "Category", "Type", "Description"
    );
    println!("{}", "─".repeat(110));
    for p in &payments {
        println!(
            "{:<10}  ₹{:>11.2}  {:<13} {:<6} {:<40} {}",
            p.day(),
            p.amount,
            p.category.as_str(),
            p.origin.as_str(),
            truncate(&p.description, 40),
            p.id
        );
    }
    let total: Decimal = payments.iter().map(|p| p.amount).sum();
    println!("{}", "─".repeat(110));
    println!("{} payments, total ₹{:.2}", payments.len(), total);
    Ok(())
}

fn cli_delete(args: &[String], db: &Database) -> Result<()> {
    let id = args
        .first()
        .ok_or_else(|| anyhow::anyhow!("Usage: spendbook delete <id>"))?;
    if !db.delete_payment(id)? {
        anyhow::bail!("No payment with id {id}");
    }
    println!("Deleted {id}");
    Ok(())
}

fn cli_export(args: &[String], db: &Database) -> Result<()> {
    let output_path = args
        .first()
        .filter(|a| !a.starts_with('-'))
        .map(|a| shellexpand(a))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            let today = chrono::Local::now().format("%Y-%m-%d");
            format!("{home}/spendbook-export-{today}.csv")
        });

    let count = db.export_to_csv(&output_path)?;
    if count == 0 {
        println!("No payments to export");
    } else {
        println!("Exported {count} payments to {output_path}");
    }
    Ok(())
}

fn cli_clear_ledger(db: &Database, config: &MonitorConfig) -> Result<()> {
    let clock = SystemClock;
    let mut monitor = SmsMonitor::new(db, &NoInbox, &NoInbox, &clock, config.clone());
    monitor.hydrate();
    monitor.clear_ledger()?;
    println!("Processed SMS ledger cleared");
    Ok(())
}

fn cli_clear_window(db: &Database, config: &MonitorConfig) -> Result<()> {
    let clock = SystemClock;
    let mut monitor = SmsMonitor::new(db, &NoInbox, &NoInbox, &clock, config.clone());
    monitor.hydrate();
    monitor.clear_window()?;
    println!("Monitoring window cleared");
    Ok(())
}

fn cli_debug(db: &Database, config: &MonitorConfig) -> Result<()> {
    let clock = SystemClock;
    let mut monitor = SmsMonitor::new(db, &NoInbox, &NoInbox, &clock, config.clone());
    monitor.hydrate();
    print!("{}", monitor.debug_dump());
    println!("Payments stored:     {}", db.get_payment_count()?);
    Ok(())
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

/// Positive decimal amount; accepts a leading `₹` and thousands separators.
fn parse_amount(s: &str) -> Result<Decimal> {
    let cleaned: String = s
        .trim()
        .trim_start_matches('₹')
        .chars()
        .filter(|c| *c != ',')
        .collect();
    let amount =
        Decimal::from_str(&cleaned).with_context(|| format!("Invalid amount: {s}"))?;
    if amount <= Decimal::ZERO {
        anyhow::bail!("Amount must be positive: {s}");
    }
    Ok(amount)
}

fn parse_category(s: &str) -> Result<PaymentCategory> {
    PaymentCategory::all()
        .iter()
        .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
        .copied()
        .ok_or_else(|| {
            let names: Vec<&str> = PaymentCategory::all().iter().map(|c| c.as_str()).collect();
            anyhow::anyhow!("Unknown category: {s} (expected one of: {})", names.join(", "))
        })
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{head}…")
    }
}

pub(crate) fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/{rest}")
    } else {
        path.to_string()
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
