//! Migration ledger: the persistent record of applied units.
//!
//! The ledger table is the sole source of truth for what has been applied.
//! All SQL goes through the driver adapter; only placeholder syntax and
//! the auto-increment column differ per dialect.

use serde::{Deserialize, Serialize};

use crate::driver::{Driver, SqlDialect, SqlValue};
use crate::error::MigrateResult;

pub const DEFAULT_TABLE: &str = "migrations";

/// One applied unit: identifier (monotonic, apply-order tie-break), unit
/// name, and the batch it was applied in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerRecord {
    pub id: i64,
    pub name: String,
    pub batch: i64,
}

pub struct Ledger {
    table: String,
}

impl Ledger {
    pub fn new() -> Self {
        Self::with_table(DEFAULT_TABLE)
    }

    pub fn with_table(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Idempotently create the ledger table.
    ///
    /// `name` carries no UNIQUE constraint; uniqueness is engine
    /// discipline, and a duplicate insert is backend-defined.
    pub async fn ensure_schema(&self, driver: &dyn Driver) -> MigrateResult<()> {
        let sql = match driver.dialect() {
            SqlDialect::MySql => format!(
                "CREATE TABLE IF NOT EXISTS {} (id BIGINT NOT NULL AUTO_INCREMENT PRIMARY KEY, \
                 name VARCHAR(100) NOT NULL, batch INT NOT NULL)",
                self.table
            ),
            SqlDialect::Postgres => format!(
                "CREATE TABLE IF NOT EXISTS {} (id BIGSERIAL PRIMARY KEY, \
                 name VARCHAR(100) NOT NULL, batch INTEGER NOT NULL)",
                self.table
            ),
        };
        driver.execute(&sql).await?;
        Ok(())
    }

    /// All records, ordered by identifier ascending (apply order).
    pub async fn all(&self, driver: &dyn Driver) -> MigrateResult<Vec<LedgerRecord>> {
        let sql = format!("SELECT id, name, batch FROM {} ORDER BY id", self.table);
        let rows = driver.fetch_rows(&sql).await?;
        rows.iter()
            .map(|row| {
                Ok(LedgerRecord {
                    id: row.int(0)?,
                    name: row.text(1)?.to_string(),
                    batch: row.int(2)?,
                })
            })
            .collect()
    }

    /// Insert one record for a unit applied in `batch`.
    pub async fn record(&self, driver: &dyn Driver, name: &str, batch: i64) -> MigrateResult<()> {
        let dialect = driver.dialect();
        let sql = format!(
            "INSERT INTO {} (name, batch) VALUES ({}, {})",
            self.table,
            dialect.placeholder(0),
            dialect.placeholder(1)
        );
        driver
            .execute_with(&sql, &[SqlValue::from(name), SqlValue::Int(batch)])
            .await?;
        Ok(())
    }

    /// Delete the record for `name`; a no-op when absent.
    pub async fn remove(&self, driver: &dyn Driver, name: &str) -> MigrateResult<()> {
        let dialect = driver.dialect();
        let sql = format!(
            "DELETE FROM {} WHERE name = {}",
            self.table,
            dialect.placeholder(0)
        );
        driver.execute_with(&sql, &[SqlValue::from(name)]).await?;
        Ok(())
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}
