//! MySQL-family driver implementation on sqlx.

use async_trait::async_trait;
use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions, MySqlRow};
use sqlx::Row;
use tidemark_core::DatabaseConfig;

use super::{Driver, SqlDialect, SqlRow, SqlValue};
use crate::error::{MigrateError, MigrateResult};

pub struct MySqlDriver {
    pool: MySqlPool,
}

impl MySqlDriver {
    /// Connect with a single-connection pool so session-scoped statements
    /// (`SET FOREIGN_KEY_CHECKS`) bind to the connection every subsequent
    /// statement uses.
    pub async fn connect(config: &DatabaseConfig) -> MigrateResult<Self> {
        let mut options = MySqlConnectOptions::new()
            .host(&config.host)
            .port(config.port);
        if let Some(user) = &config.user {
            options = options.username(user);
        }
        if let Some(password) = &config.password {
            options = options.password(password);
        }
        if let Some(database) = &config.database {
            options = options.database(database);
        }

        let pool = MySqlPoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(|e| MigrateError::Connection(format!("failed to connect to MySQL: {}", e)))?;

        Ok(Self { pool })
    }
}

fn decode_row(row: &MySqlRow) -> MigrateResult<SqlRow> {
    let mut values = Vec::with_capacity(row.columns().len());
    for index in 0..row.columns().len() {
        values.push(decode_column(row, index)?);
    }
    Ok(SqlRow::new(values))
}

fn decode_column(row: &MySqlRow, index: usize) -> MigrateResult<SqlValue> {
    if let Ok(value) = row.try_get::<i64, _>(index) {
        return Ok(SqlValue::Int(value));
    }
    if let Ok(value) = row.try_get::<u64, _>(index) {
        return Ok(SqlValue::Int(value as i64));
    }
    if let Ok(value) = row.try_get::<i32, _>(index) {
        return Ok(SqlValue::Int(value.into()));
    }
    row.try_get::<String, _>(index)
        .map(SqlValue::Text)
        .map_err(|e| MigrateError::Execution(format!("unsupported column type at {}: {}", index, e)))
}

#[async_trait]
impl Driver for MySqlDriver {
    fn dialect(&self) -> SqlDialect {
        SqlDialect::MySql
    }

    async fn execute(&self, sql: &str) -> MigrateResult<u64> {
        let result = sqlx::query(sql)
            .execute(&self.pool)
            .await
            .map_err(|e| MigrateError::Execution(e.to_string()))?;
        Ok(result.rows_affected())
    }

    async fn execute_with(&self, sql: &str, params: &[SqlValue]) -> MigrateResult<u64> {
        let mut query = sqlx::query(sql);
        for param in params {
            query = match param {
                SqlValue::Int(value) => query.bind(value),
                SqlValue::Text(value) => query.bind(value),
            };
        }
        let result = query
            .execute(&self.pool)
            .await
            .map_err(|e| MigrateError::Execution(e.to_string()))?;
        Ok(result.rows_affected())
    }

    async fn fetch_rows(&self, sql: &str) -> MigrateResult<Vec<SqlRow>> {
        let rows = sqlx::query(sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| MigrateError::Execution(e.to_string()))?;
        rows.iter().map(decode_row).collect()
    }

    async fn list_tables(&self) -> MigrateResult<Vec<String>> {
        let rows = sqlx::query("SHOW TABLES")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| MigrateError::Execution(e.to_string()))?;
        rows.iter()
            .map(|row| {
                row.try_get::<String, _>(0)
                    .map_err(|e| MigrateError::Execution(e.to_string()))
            })
            .collect()
    }

    async fn drop_table(&self, table: &str) -> MigrateResult<()> {
        let quote = self.dialect().identifier_quote();
        self.execute(&format!("DROP TABLE {quote}{table}{quote}"))
            .await?;
        Ok(())
    }

    async fn set_constraint_checks(&self, enabled: bool) -> MigrateResult<()> {
        let flag = if enabled { 1 } else { 0 };
        self.execute(&format!("SET FOREIGN_KEY_CHECKS = {flag}"))
            .await?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
