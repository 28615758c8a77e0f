//! # Store Errors
//!
//! Error types for the record repository.

use thiserror::Error;

use crate::schema::SchemaError;

/// Result type for repository operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Repository errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// No record matches the key
    #[error("Record not found")]
    NotFound,

    /// Create without a value for a key the store does not generate
    #[error("Missing value for primary key '{0}'")]
    MissingKey(String),

    /// Create with a key that is already taken
    #[error("Duplicate primary key '{0}'")]
    DuplicateKey(String),

    /// Update with no non-key column to set
    #[error("Nothing to update")]
    NothingToUpdate,

    /// Structural schema problem, e.g. no primary key
    #[error("{0}")]
    Schema(#[from] SchemaError),

    /// Driver or server failure
    #[error("Database error: {0}")]
    Database(#[from] mysql_async::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound)
    }
}
