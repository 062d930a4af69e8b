//! Error types for engine operations.

use database::{DatabaseError, ValidationError};
use thiserror::Error;

/// Errors that can occur during lead lifecycle operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Malformed or missing input. Surfaced immediately, never retried.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Operation references a record that does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Actor fails a state-machine guard.
    #[error("not permitted: {0}")]
    Forbidden(String),

    /// Operation is illegal in the lead's current state. The caller should
    /// re-fetch and retry with corrected intent, not blindly repeat.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The store failed; propagated unmodified, no internal retry.
    #[error("store error: {0}")]
    Store(DatabaseError),
}

impl From<DatabaseError> for EngineError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound { entity, id } => Self::NotFound { entity, id },
            DatabaseError::AlreadyConverted { id } => {
                Self::Conflict(format!("lead already converted: {}", id))
            }
            DatabaseError::Conflict { entity, id, reason } => {
                Self::Conflict(format!("{} {}: {}", entity, id, reason))
            }
            other => Self::Store(other),
        }
    }
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
