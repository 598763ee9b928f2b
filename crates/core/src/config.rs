//! Environment-sourced database configuration and driver selection.
//!
//! Configuration is read once at startup from `DB_*` variables; an
//! unrecognized driver alias is fatal before any engine operation runs.

use std::env;

use crate::error::TidemarkError;

/// Supported database backend families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverKind {
    MySql,
    Postgres,
}

impl DriverKind {
    /// Resolve a driver name through the alias table, case-insensitively.
    ///
    /// Returns `None` for anything outside the recognized set.
    pub fn from_alias(alias: &str) -> Option<Self> {
        match alias.to_ascii_lowercase().as_str() {
            "mysql" => Some(DriverKind::MySql),
            "pg" | "psql" | "postgre" | "postgresql" => Some(DriverKind::Postgres),
            _ => None,
        }
    }

    /// Conventional server port for the backend family.
    pub fn default_port(&self) -> u16 {
        match self {
            DriverKind::MySql => 3306,
            DriverKind::Postgres => 5432,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DriverKind::MySql => "mysql",
            DriverKind::Postgres => "postgres",
        }
    }
}

impl Default for DriverKind {
    fn default() -> Self {
        DriverKind::MySql
    }
}

/// Connection settings for a single invocation.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub driver: DriverKind,
    pub host: String,
    pub port: u16,
    pub user: Option<String>,
    pub password: Option<String>,
    pub database: Option<String>,
}

impl DatabaseConfig {
    /// Build a configuration from `DB_DRIVER`, `DB_HOST`, `DB_PORT`,
    /// `DB_USER`, `DB_PASSWORD` (`DB_PASS` accepted as a fallback
    /// spelling), and `DB_NAME`.
    pub fn from_env() -> Result<Self, TidemarkError> {
        let driver = match env::var("DB_DRIVER") {
            Ok(raw) => DriverKind::from_alias(&raw).ok_or_else(|| {
                TidemarkError::Configuration(format!("unsupported database driver '{}'", raw))
            })?,
            Err(_) => DriverKind::default(),
        };

        let host = env::var("DB_HOST").unwrap_or_else(|_| "localhost".to_string());

        let port = match env::var("DB_PORT") {
            Ok(raw) => raw.parse::<u16>().map_err(|_| {
                TidemarkError::Configuration(format!("invalid DB_PORT value '{}'", raw))
            })?,
            Err(_) => driver.default_port(),
        };

        Ok(Self {
            driver,
            host,
            port,
            user: env::var("DB_USER").ok(),
            password: env::var("DB_PASSWORD")
                .ok()
                .or_else(|| env::var("DB_PASS").ok()),
            database: env::var("DB_NAME").ok(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: &[&str] = &[
        "DB_DRIVER", "DB_HOST", "DB_PORT", "DB_USER", "DB_PASSWORD", "DB_PASS", "DB_NAME",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn alias_table_is_case_insensitive() {
        assert_eq!(DriverKind::from_alias("mysql"), Some(DriverKind::MySql));
        assert_eq!(DriverKind::from_alias("MySQL"), Some(DriverKind::MySql));
        assert_eq!(DriverKind::from_alias("pg"), Some(DriverKind::Postgres));
        assert_eq!(DriverKind::from_alias("PSQL"), Some(DriverKind::Postgres));
        assert_eq!(DriverKind::from_alias("postgre"), Some(DriverKind::Postgres));
        assert_eq!(
            DriverKind::from_alias("PostgreSQL"),
            Some(DriverKind::Postgres)
        );
        assert_eq!(DriverKind::from_alias("sqlite"), None);
        assert_eq!(DriverKind::from_alias(""), None);
    }

    #[test]
    #[serial]
    fn defaults_when_env_is_empty() {
        clear_env();
        let config = DatabaseConfig::from_env().unwrap();
        assert_eq!(config.driver, DriverKind::MySql);
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 3306);
        assert!(config.user.is_none());
        assert!(config.password.is_none());
        assert!(config.database.is_none());
    }

    #[test]
    #[serial]
    fn postgres_alias_switches_default_port() {
        clear_env();
        env::set_var("DB_DRIVER", "psql");
        let config = DatabaseConfig::from_env().unwrap();
        assert_eq!(config.driver, DriverKind::Postgres);
        assert_eq!(config.port, 5432);
        clear_env();
    }

    #[test]
    #[serial]
    fn explicit_port_overrides_default() {
        clear_env();
        env::set_var("DB_DRIVER", "pg");
        env::set_var("DB_PORT", "6543");
        let config = DatabaseConfig::from_env().unwrap();
        assert_eq!(config.port, 6543);
        clear_env();
    }

    #[test]
    #[serial]
    fn unknown_driver_alias_is_fatal() {
        clear_env();
        env::set_var("DB_DRIVER", "oracle");
        let err = DatabaseConfig::from_env().unwrap_err();
        assert!(matches!(err, TidemarkError::Configuration(_)));
        clear_env();
    }

    #[test]
    #[serial]
    fn malformed_port_is_fatal() {
        clear_env();
        env::set_var("DB_PORT", "not-a-port");
        let err = DatabaseConfig::from_env().unwrap_err();
        assert!(matches!(err, TidemarkError::Configuration(_)));
        clear_env();
    }

    #[test]
    #[serial]
    fn db_pass_is_accepted_as_password_fallback() {
        clear_env();
        env::set_var("DB_PASS", "secret");
        let config = DatabaseConfig::from_env().unwrap();
        assert_eq!(config.password.as_deref(), Some("secret"));

        env::set_var("DB_PASSWORD", "preferred");
        let config = DatabaseConfig::from_env().unwrap();
        assert_eq!(config.password.as_deref(), Some("preferred"));
        clear_env();
    }
}
