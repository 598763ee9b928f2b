mod commands;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tidemark")]
#[command(about = "Batch-tracked SQL migration runner", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply every pending migration as a new batch
    Migrate,

    /// Revert the most recently applied batch
    Rollback,

    /// Roll back through the ledger, then re-apply everything
    Refresh,

    /// Drop every table in the database and migrate from scratch
    Fresh,

    /// Run the seed scripts, statement by statement
    Seed,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("tidemark_migrate=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Migrate => commands::migrate::run().await,
        Commands::Rollback => commands::migrate::rollback().await,
        Commands::Refresh => commands::migrate::refresh().await,
        Commands::Fresh => commands::db::fresh().await,
        Commands::Seed => commands::db::seed().await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", style(err).red());
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
