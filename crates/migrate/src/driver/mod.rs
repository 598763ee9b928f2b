//! Driver adapter: the SQL execution surface the engine and ledger are
//! written against, with one implementation per backend family.
//!
//! Backend-specific quirks (parameter placeholder syntax, identifier
//! quoting, table listing, constraint suspension) live behind this
//! interface so the engine is expressed once.

use async_trait::async_trait;
use tidemark_core::{DatabaseConfig, DriverKind};

use crate::error::{MigrateError, MigrateResult};

mod mysql;
mod postgres;

pub use mysql::MySqlDriver;
pub use postgres::PostgresDriver;

/// SQL dialect for generating backend-specific fragments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlDialect {
    MySql,
    Postgres,
}

impl SqlDialect {
    /// Positional parameter placeholder for a zero-based index.
    pub fn placeholder(&self, index: usize) -> String {
        match self {
            SqlDialect::MySql => "?".to_string(),
            SqlDialect::Postgres => format!("${}", index + 1),
        }
    }

    /// Quote character for identifiers in this dialect.
    pub fn identifier_quote(&self) -> char {
        match self {
            SqlDialect::MySql => '`',
            SqlDialect::Postgres => '"',
        }
    }
}

/// Parameter and cell value for driver calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlValue {
    Int(i64),
    Text(String),
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Int(value)
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(value)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

/// One fetched row, cells in select-list order.
#[derive(Debug, Clone)]
pub struct SqlRow {
    values: Vec<SqlValue>,
}

impl SqlRow {
    pub fn new(values: Vec<SqlValue>) -> Self {
        Self { values }
    }

    pub fn int(&self, index: usize) -> MigrateResult<i64> {
        match self.values.get(index) {
            Some(SqlValue::Int(value)) => Ok(*value),
            other => Err(MigrateError::Execution(format!(
                "expected integer in column {}, got {:?}",
                index, other
            ))),
        }
    }

    pub fn text(&self, index: usize) -> MigrateResult<&str> {
        match self.values.get(index) {
            Some(SqlValue::Text(value)) => Ok(value),
            other => Err(MigrateError::Execution(format!(
                "expected text in column {}, got {:?}",
                index, other
            ))),
        }
    }
}

/// Abstract SQL execution surface for one backend connection.
#[async_trait]
pub trait Driver: Send + Sync {
    /// Dialect used when composing SQL for this backend.
    fn dialect(&self) -> SqlDialect;

    /// Run a statement, returning the affected row count.
    async fn execute(&self, sql: &str) -> MigrateResult<u64>;

    /// Run a statement with positional parameters.
    async fn execute_with(&self, sql: &str, params: &[SqlValue]) -> MigrateResult<u64>;

    /// Run a query and return all rows.
    async fn fetch_rows(&self, sql: &str) -> MigrateResult<Vec<SqlRow>>;

    /// Names of every table in the current database, in catalog order.
    async fn list_tables(&self) -> MigrateResult<Vec<String>>;

    /// Drop a single table. The name must come from [`Driver::list_tables`]
    /// (the server's own catalog), never from external input.
    async fn drop_table(&self, table: &str) -> MigrateResult<()>;

    /// Toggle foreign-key/trigger enforcement for this session. Tables are
    /// dropped in enumeration order, not dependency order, so enforcement
    /// is suspended around bulk drops.
    async fn set_constraint_checks(&self, enabled: bool) -> MigrateResult<()>;

    /// Release the underlying connection.
    async fn close(&self);
}

/// Open a connection for the configured backend.
pub async fn connect(config: &DatabaseConfig) -> MigrateResult<Box<dyn Driver>> {
    match config.driver {
        DriverKind::MySql => Ok(Box::new(MySqlDriver::connect(config).await?)),
        DriverKind::Postgres => Ok(Box::new(PostgresDriver::connect(config).await?)),
    }
}
