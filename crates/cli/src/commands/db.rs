use console::style;
use tidemark_core::TidemarkError;

use super::build_migrator;

/// `tidemark fresh`: drop every table, then migrate from empty.
/// Destructive; there is no confirmation step.
pub async fn fresh() -> Result<(), TidemarkError> {
    let migrator = build_migrator().await?;
    let result = migrator.fresh().await;
    migrator.close().await;
    let outcome = result?;

    println!(
        "{}",
        style(format!("Dropped {} table(s)", outcome.dropped.len())).yellow()
    );
    println!(
        "{}",
        style(format!(
            "Finished migrating batch {} ({} applied)",
            outcome.migrate.batch,
            outcome.migrate.applied.len()
        ))
        .green()
    );
    Ok(())
}

/// `tidemark seed`: run every seed script, statement by statement.
pub async fn seed() -> Result<(), TidemarkError> {
    let migrator = build_migrator().await?;
    let result = migrator.seed().await;
    migrator.close().await;
    let outcome = result?;

    if outcome.seeded.is_empty() {
        println!("{}", style("No seed scripts found").yellow());
    } else {
        for unit in &outcome.seeded {
            println!("{}", style(format!("Seeded {}", unit)).yellow());
        }
        println!(
            "{}",
            style(format!(
                "Seeding completed ({} statement(s))",
                outcome.statements
            ))
            .green()
        );
    }
    Ok(())
}
