mod schema;

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;

use crate::models::*;
use crate::store::{PaymentStore, SettingsStore};

pub(crate) struct Database {
    conn: Connection,
}

impl Database {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .context("Failed to set database pragmas")?;
        let mut db = Self { conn };
        db.migrate().context("Database migration failed")?;
        Ok(db)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let mut db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&mut self) -> Result<()> {
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;

        if !has_version_table {
            self.conn.execute_batch(schema::SCHEMA_V1)?;
            self.conn.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![schema::CURRENT_VERSION],
            )?;
            return Ok(());
        }

        let current: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .unwrap_or(0);

        for &(from_version, sql) in schema::MIGRATIONS {
            if current <= from_version {
                self.conn.execute_batch(sql)?;
            }
        }

        if current < schema::CURRENT_VERSION {
            self.conn.execute(
                "UPDATE schema_version SET version = ?1",
                params![schema::CURRENT_VERSION],
            )?;
        }

        Ok(())
    }

    // ── Payments ──────────────────────────────────────────────

    /// Payments matching `filter`, newest first.
    pub(crate) fn get_payments(&self, filter: PaymentFilter) -> Result<Vec<Payment>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, amount, description, category, date, origin, is_from_sms
             FROM payments
             WHERE ?1 IS NULL OR origin = ?1
             ORDER BY date DESC, created_at DESC",
        )?;
        let origin = match filter {
            PaymentFilter::All => None,
            PaymentFilter::Manual => Some(PaymentOrigin::Manual.as_str()),
            PaymentFilter::Sms => Some(PaymentOrigin::Sms.as_str()),
        };
        let rows = stmt.query_map(params![origin], |row| {
            let amount_str: String = row.get(1)?;
            let category: String = row.get(3)?;
            let origin: String = row.get(5)?;
            Ok(Payment {
                id: row.get(0)?,
                amount: Decimal::from_str(&amount_str).unwrap_or_default(),
                description: row.get(2)?,
                category: PaymentCategory::parse(&category),
                date: row.get(4)?,
                origin: PaymentOrigin::parse(&origin),
                is_from_sms: row.get(6)?,
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn get_payment_count(&self) -> Result<i64> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM payments", [], |row| row.get(0))?)
    }

    /// Returns false when no payment had that id.
    pub(crate) fn delete_payment(&self, id: &str) -> Result<bool> {
        let n = self
            .conn
            .execute("DELETE FROM payments WHERE id = ?1", params![id])?;
        Ok(n > 0)
    }

    /// Write every payment to `path` as CSV. Returns the number of rows written.
    pub(crate) fn export_to_csv(&self, path: &str) -> Result<usize> {
        let payments = self.get_payments(PaymentFilter::All)?;
        let mut wtr = csv::Writer::from_path(path)
            .with_context(|| format!("Failed to create export file: {path}"))?;
        wtr.write_record(["Date", "Amount", "Category", "Description", "Type"])?;
        for p in &payments {
            wtr.write_record([
                p.day(),
                format!("{:.2}", p.amount),
                p.category.as_str().to_string(),
                p.description.clone(),
                p.origin.as_str().to_string(),
            ])?;
        }
        wtr.flush().context("Failed to flush export file")?;
        Ok(payments.len())
    }
}

impl SettingsStore for Database {
    fn get_setting(&self, key: &str) -> Result<Option<String>> {
        Ok(self
            .conn
            .query_row(
                "SELECT value FROM settings WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?)
    }

    fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO settings (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                params![key, value],
            )
            .with_context(|| format!("Failed to write setting '{key}'"))?;
        Ok(())
    }

    fn remove_setting(&self, key: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM settings WHERE key = ?1", params![key])
            .with_context(|| format!("Failed to remove setting '{key}'"))?;
        Ok(())
    }
}

impl PaymentStore for Database {
    fn create_payment(&self, payment: &Payment) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO payments (id, amount, description, category, date, origin, is_from_sms, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    payment.id,
                    payment.amount.to_string(),
                    payment.description,
                    payment.category.as_str(),
                    payment.date,
                    payment.origin.as_str(),
                    payment.is_from_sms,
                    chrono::Utc::now().to_rfc3339(),
                ],
            )
            .with_context(|| format!("Failed to insert payment {}", payment.id))?;
        Ok(())
    }
}
