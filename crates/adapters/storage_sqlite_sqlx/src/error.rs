//! Storage-specific error type wrapping sqlx errors.

use catpoint_domain::error::{ParseEnumError, SecurityError};

/// Errors originating from the `SQLite` storage layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A query or connection failed.
    #[error("database error")]
    Database(#[from] sqlx::Error),

    /// Failed to run migrations.
    #[error("migration error")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A stored status string names no known status.
    #[error("corrupt status value")]
    Corrupt(#[from] ParseEnumError),

    /// The single status row is gone.
    #[error("security status row is missing")]
    MissingStatusRow,
}

impl From<StorageError> for SecurityError {
    fn from(err: StorageError) -> Self {
        Self::repository(err)
    }
}
