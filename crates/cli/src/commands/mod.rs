pub mod db;
pub mod migrate;

use tidemark_core::{DatabaseConfig, TidemarkError};
use tidemark_migrate::{driver, Migrator, ScriptStore, SeedStore};

pub const MIGRATIONS_DIR: &str = "migrations";
pub const SEEDERS_DIR: &str = "seeders";

/// Resolve configuration, open the backend connection and assemble the
/// engine. Configuration failures are fatal before any database work.
pub(crate) async fn build_migrator() -> Result<Migrator, TidemarkError> {
    let config = DatabaseConfig::from_env()?;
    let driver = driver::connect(&config).await?;
    Ok(Migrator::new(
        driver,
        ScriptStore::new(MIGRATIONS_DIR),
        SeedStore::new(SEEDERS_DIR),
    ))
}
