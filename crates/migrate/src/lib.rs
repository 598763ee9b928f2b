//! Batch-tracked SQL migration engine.
//!
//! Migration units live as `migrations/<name>/up.sql` + `down.sql` on
//! disk; applied units are recorded in a ledger table together with a
//! batch number so the most recent batch can be reverted as a unit. The
//! engine is written once against the [`driver::Driver`] adapter and is
//! backend-agnostic; MySQL-family and Postgres-family implementations are
//! provided.

pub mod driver;
pub mod engine;
pub mod error;
pub mod ledger;
pub mod scripts;
pub mod seeds;
pub mod sql;

pub use engine::{
    FreshOutcome, MigrateOutcome, Migrator, RefreshOutcome, RollbackOutcome, SeedOutcome,
};
pub use error::{MigrateError, MigrateResult};
pub use ledger::{Ledger, LedgerRecord};
pub use scripts::ScriptStore;
pub use seeds::SeedStore;
