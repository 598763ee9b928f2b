use console::style;
use tidemark_core::TidemarkError;

use super::build_migrator;

/// `tidemark migrate`: apply every pending unit as one new batch.
pub async fn run() -> Result<(), TidemarkError> {
    let migrator = build_migrator().await?;
    let result = migrator.migrate().await;
    migrator.close().await;
    let outcome = result?;

    if outcome.applied.is_empty() {
        println!("{}", style("Nothing to migrate").yellow());
    } else {
        for unit in &outcome.applied {
            println!("{}", style(format!("Migrated {}", unit)).green());
        }
        println!(
            "{}",
            style(format!(
                "Finished migrating batch {} ({} applied, {} already migrated)",
                outcome.batch,
                outcome.applied.len(),
                outcome.skipped
            ))
            .green()
        );
    }
    Ok(())
}

/// `tidemark rollback`: revert the most recent batch.
pub async fn rollback() -> Result<(), TidemarkError> {
    let migrator = build_migrator().await?;
    let result = migrator.rollback().await;
    migrator.close().await;
    let outcome = result?;

    if outcome.batch == 0 {
        println!("{}", style("No migrations to revert").yellow());
    } else {
        for unit in &outcome.reverted {
            println!("{}", style(format!("Rolled back {}", unit)).green());
        }
        println!(
            "{}",
            style(format!("Finished reverting batch {}", outcome.batch)).green()
        );
    }
    Ok(())
}

/// `tidemark refresh`: roll the ledger back, then re-apply everything.
pub async fn refresh() -> Result<(), TidemarkError> {
    let migrator = build_migrator().await?;
    let result = migrator.refresh().await;
    migrator.close().await;
    let outcome = result?;

    let reverted: usize = outcome.rollbacks.iter().map(|r| r.reverted.len()).sum();
    println!(
        "{}",
        style(format!("Reverted {} migration(s)", reverted)).yellow()
    );
    println!(
        "{}",
        style(format!(
            "Finished refreshing ({} re-applied as batch {})",
            outcome.migrate.applied.len(),
            outcome.migrate.batch
        ))
        .green()
    );
    Ok(())
}
