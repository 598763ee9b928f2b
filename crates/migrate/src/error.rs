use std::path::PathBuf;

use thiserror::Error;
use tidemark_core::TidemarkError;

/// Result type alias for migration operations.
pub type MigrateResult<T> = Result<T, MigrateError>;

/// Error types for the migration engine.
///
/// Every operation propagates the first failure to its caller; nothing is
/// retried and no compensating action is taken.
#[derive(Debug, Error)]
pub enum MigrateError {
    /// An expected up/down/seed script file is absent.
    #[error("migration script not found: {}", .0.display())]
    ScriptNotFound(PathBuf),

    /// Filesystem fault while reading a script.
    #[error("failed to read {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The backend connection could not be established.
    #[error("database connection failed: {0}")]
    Connection(String),

    /// A SQL statement failed on the backend.
    #[error("sql execution failed: {0}")]
    Execution(String),
}

impl From<MigrateError> for TidemarkError {
    fn from(err: MigrateError) -> Self {
        TidemarkError::Database {
            message: err.to_string(),
        }
    }
}
