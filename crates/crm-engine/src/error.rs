//! # Engine Error Types
//!
//! The error surface callers of [`crate::Engine`] see. Validation failures
//! and database failures keep their own types; `NotFound` covers referential
//! lookups that came up empty during a mutation.

use thiserror::Error;

use crm_core::ValidationError;
use crm_db::DbError;

/// Errors returned by engine operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A referenced entity does not exist.
    #[error("{entity} not found")]
    NotFound { entity: String },

    /// Input failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Database operation failed.
    #[error(transparent)]
    Db(#[from] DbError),
}

impl EngineError {
    pub fn not_found(entity: impl Into<String>) -> Self {
        EngineError::NotFound {
            entity: entity.into(),
        }
    }
}

/// Result alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
