use thiserror::Error;

/// Top-level error surfaced by the CLI.
///
/// Library failures are wrapped into `Database` at the crate boundary;
/// `Configuration` is fatal at startup, before any database work runs.
#[derive(Debug, Error)]
pub enum TidemarkError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Database error: {message}")]
    Database { message: String },
}
