//! Migration engine: the state machine over ledger, scripts and driver.
//!
//! Each operation runs start to finish on one logical connection with
//! strictly sequential awaits; units within a batch apply in a strict
//! total order and revert in the reverse of it. Failures stop the
//! operation at the failing unit and surface to the caller; nothing is
//! retried and no compensating action is taken.

use std::collections::HashSet;

use serde::Serialize;
use tracing::info;

use crate::driver::Driver;
use crate::error::MigrateResult;
use crate::ledger::{Ledger, LedgerRecord};
use crate::scripts::ScriptStore;
use crate::seeds::SeedStore;
use crate::sql::split_statements;

/// Result of a migrate run.
#[derive(Debug, Clone, Serialize)]
pub struct MigrateOutcome {
    /// Batch number assigned to this run.
    pub batch: i64,
    /// Units applied, in apply order.
    pub applied: Vec<String>,
    /// Units skipped because they were already recorded.
    pub skipped: usize,
}

/// Result of a rollback run. `batch` is 0 when the ledger was empty.
#[derive(Debug, Clone, Serialize)]
pub struct RollbackOutcome {
    pub batch: i64,
    /// Units reverted, in revert (reverse-apply) order.
    pub reverted: Vec<String>,
}

/// Result of a refresh run: every rollback pass, then the final migrate.
#[derive(Debug, Clone, Serialize)]
pub struct RefreshOutcome {
    pub rollbacks: Vec<RollbackOutcome>,
    pub migrate: MigrateOutcome,
}

/// Result of a fresh run: tables dropped, then the migrate from empty.
#[derive(Debug, Clone, Serialize)]
pub struct FreshOutcome {
    pub dropped: Vec<String>,
    pub migrate: MigrateOutcome,
}

/// Result of a seed run.
#[derive(Debug, Clone, Serialize)]
pub struct SeedOutcome {
    pub seeded: Vec<String>,
    pub statements: usize,
}

pub struct Migrator {
    driver: Box<dyn Driver>,
    scripts: ScriptStore,
    seeds: SeedStore,
    ledger: Ledger,
}

impl Migrator {
    pub fn new(driver: Box<dyn Driver>, scripts: ScriptStore, seeds: SeedStore) -> Self {
        Self {
            driver,
            scripts,
            seeds,
            ledger: Ledger::new(),
        }
    }

    pub fn with_ledger(mut self, ledger: Ledger) -> Self {
        self.ledger = ledger;
        self
    }

    /// Apply every pending unit, in natural order, as one new batch.
    ///
    /// A unit that fails mid-run is not recorded and stops the run; units
    /// recorded before it stay recorded. A run that finds nothing pending
    /// performs no ledger writes.
    pub async fn migrate(&self) -> MigrateResult<MigrateOutcome> {
        self.ledger.ensure_schema(self.driver.as_ref()).await?;

        let records = self.ledger.all(self.driver.as_ref()).await?;
        let batch = records.iter().map(|r| r.batch).max().unwrap_or(0) + 1;
        let recorded: HashSet<&str> = records.iter().map(|r| r.name.as_str()).collect();

        let mut applied = Vec::new();
        let mut skipped = 0;
        for unit in self.scripts.list_units()? {
            if recorded.contains(unit.as_str()) {
                info!("{} already migrated", unit);
                skipped += 1;
                continue;
            }

            info!("migrating {}", unit);
            let sql = self.scripts.load_forward(&unit)?;
            self.run_statements(&sql).await?;
            self.ledger.record(self.driver.as_ref(), &unit, batch).await?;
            applied.push(unit);
        }

        info!("finished migrating");
        Ok(MigrateOutcome {
            batch,
            applied,
            skipped,
        })
    }

    /// Revert the most recent batch, last-applied unit first.
    ///
    /// Returns batch 0 when the ledger holds nothing to revert. A failure
    /// mid-batch stops further reverts, leaving part of the batch applied.
    pub async fn rollback(&self) -> MigrateResult<RollbackOutcome> {
        let records = self.ledger.all(self.driver.as_ref()).await?;

        let Some(batch) = records.iter().map(|r| r.batch).max() else {
            info!("no migrations to revert");
            return Ok(RollbackOutcome {
                batch: 0,
                reverted: Vec::new(),
            });
        };

        info!("reverting batch {}", batch);
        let mut targets: Vec<&LedgerRecord> =
            records.iter().filter(|r| r.batch == batch).collect();
        targets.sort_by(|a, b| b.id.cmp(&a.id));

        let mut reverted = Vec::new();
        for record in targets {
            info!("rolling back {}", record.name);
            let sql = self.scripts.load_backward(&record.name)?;
            self.run_statements(&sql).await?;
            self.ledger.remove(self.driver.as_ref(), &record.name).await?;
            reverted.push(record.name.clone());
        }

        info!("finished reverting");
        Ok(RollbackOutcome { batch, reverted })
    }

    /// Roll back batch by batch, then re-apply everything as one batch.
    ///
    /// The loop checks the reverted batch number after each pass and stops
    /// once it is 1 or lower, so the pass that reports batch 1 has already
    /// reverted it; the bound only skips a final empty-ledger pass.
    pub async fn refresh(&self) -> MigrateResult<RefreshOutcome> {
        let mut rollbacks = Vec::new();
        loop {
            let outcome = self.rollback().await?;
            let batch = outcome.batch;
            rollbacks.push(outcome);
            if batch <= 1 {
                break;
            }
        }

        let migrate = self.migrate().await?;
        Ok(RefreshOutcome { rollbacks, migrate })
    }

    /// Drop every table in the database, then migrate from empty.
    ///
    /// Tables are enumerated from the catalog, not the ledger, and dropped
    /// in enumeration order with constraint enforcement suspended; it is
    /// restored even when a drop fails. Destructive, with no confirmation
    /// at this layer.
    pub async fn fresh(&self) -> MigrateResult<FreshOutcome> {
        info!("dropping all tables");
        let tables = self.driver.list_tables().await?;

        self.driver.set_constraint_checks(false).await?;
        let mut dropped = Vec::new();
        let mut failure = None;
        for table in &tables {
            info!("dropping table {}", table);
            match self.driver.drop_table(table).await {
                Ok(()) => dropped.push(table.clone()),
                Err(err) => {
                    failure = Some(err);
                    break;
                }
            }
        }
        self.driver.set_constraint_checks(true).await?;
        if let Some(err) = failure {
            return Err(err);
        }

        info!("finished dropping tables");
        let migrate = self.migrate().await?;
        Ok(FreshOutcome { dropped, migrate })
    }

    /// Run every seed unit, statement by statement, in store order.
    ///
    /// Seeding never touches the ledger and is re-run in full on every
    /// invocation; idempotence, if wanted, belongs in the SQL itself.
    pub async fn seed(&self) -> MigrateResult<SeedOutcome> {
        let mut seeded = Vec::new();
        let mut statements = 0;
        for unit in self.seeds.list_units()? {
            info!("seeding {}", unit);
            let sql = self.seeds.load(&unit)?;
            for statement in split_statements(&sql) {
                self.driver.execute(&statement).await?;
                statements += 1;
            }
            seeded.push(unit);
        }

        info!("seeding completed");
        Ok(SeedOutcome { seeded, statements })
    }

    /// Release the underlying connection.
    pub async fn close(self) {
        self.driver.close().await;
    }

    async fn run_statements(&self, sql: &str) -> MigrateResult<()> {
        for statement in split_statements(sql) {
            self.driver.execute(&statement).await?;
        }
        Ok(())
    }
}
