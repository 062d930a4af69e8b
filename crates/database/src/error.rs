//! Database error types.

use thiserror::Error;

/// Errors that can occur during database operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// SQLx error (connection, query, etc.)
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// Migration error
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Record not found
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Record already exists
    #[error("{entity} already exists: {id}")]
    AlreadyExists { entity: &'static str, id: String },

    /// Write rejected because the record was not in the expected state.
    #[error("{entity} conflict for {id}: {reason}")]
    Conflict {
        entity: &'static str,
        id: String,
        reason: String,
    },

    /// Conversion attempted on a lead that already carries a project.
    #[error("lead already converted: {id}")]
    AlreadyConverted { id: String },
}

/// Result type for database operations.
pub type Result<T> = std::result::Result<T, DatabaseError>;
