//! Unified application errors
//!
//! Nothing in this system is fatal: validation and lookup failures are
//! surfaced to the caller as values, storage corruption falls back to
//! the default dataset and delivery failures fall back to the in-app
//! banner. `AppError` covers the remaining genuinely erroneous paths
//! (storage I/O, bad input to an operation, broken invariants).

use thiserror::Error;

use crate::db::StorageError;

pub type AppResult<T> = Result<T, AppError>;

/// Application error enum
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid input to an operation (400-class)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Referenced entity does not exist
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Operation conflicts with an invariant (e.g. deleting the last group)
    #[error("Business rule violation: {0}")]
    BusinessRule(String),

    /// Persistence layer failure
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Anything else
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

// ========== Helper Constructors ==========

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn business_rule(msg: impl Into<String>) -> Self {
        Self::BusinessRule(msg.into())
    }
}
