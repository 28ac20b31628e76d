//! # Error Types
//!
//! The validation error taxonomy for the CRM engine.
//!
//! ## Error Hierarchy
//! ```text
//! crm-core errors (this file)
//! └── ValidationError  - Input validation failures
//!
//! crm-db errors (separate crate)
//! └── DbError          - Database operation failures
//!
//! crm-engine errors
//! └── EngineError      - What mutation/query callers see
//!
//! Flow: ValidationError → EngineError → caller
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (field, value, bounds)
//! 3. Errors are enum variants, never String
//! 4. Batch operations collect errors instead of raising them

use thiserror::Error;

/// Input validation errors.
///
/// Single-entity mutations surface the first failing variant and perform no
/// write; batch creation converts these into per-item entries in an error
/// list returned alongside whatever succeeded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field fails a pattern or type check (e.g. phone characters).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Numeric field outside allowed bounds (e.g. price <= 0).
    #[error("{field} must be between {min} and {max}")]
    InvalidRange { field: String, min: i64, max: i64 },

    /// Uniqueness violation (e.g. duplicate customer email).
    #[error("{field} '{value}' already exists")]
    DuplicateKey { field: String, value: String },
}

impl ValidationError {
    /// Creates a Required error.
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }

    /// Creates an InvalidFormat error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates an InvalidRange error.
    pub fn invalid_range(field: impl Into<String>, min: i64, max: i64) -> Self {
        ValidationError::InvalidRange {
            field: field.into(),
            min,
            max,
        }
    }

    /// Creates a DuplicateKey error.
    pub fn duplicate_key(field: impl Into<String>, value: impl Into<String>) -> Self {
        ValidationError::DuplicateKey {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Returns the field this error refers to.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::InvalidFormat { field, .. }
            | ValidationError::InvalidRange { field, .. }
            | ValidationError::DuplicateKey { field, .. } => field,
        }
    }
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Unit Tests
// =============================================================================
