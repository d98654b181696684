//! Core error types for the onboarding workflow engine.
//!
//! This module defines database-agnostic error types. Storage-specific errors
//! (from Diesel, SQLite, etc.) are converted to these types by the storage layer.
//! Workflow policy and conflict failures are carried by [`WorkflowError`] so
//! callers can branch on [`FailureKind`] instead of parsing messages.

use thiserror::Error;

use crate::signatures::SignatureError;
use crate::workflow::{FailureKind, TransitionRejection, WorkflowError};

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the onboarding engine.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Database operation failed: {0}")]
    Database(#[from] DatabaseError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    Workflow(#[from] WorkflowError),

    #[error("Notification delivery failed: {0}")]
    Notification(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl Error {
    /// Returns the typed failure kind for policy and conflict errors.
    ///
    /// Infrastructure and validation errors return `None`.
    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            Error::Workflow(e) => Some(e.kind()),
            _ => None,
        }
    }

    /// True when the error is a lost conditional write.
    pub fn is_conflict(&self) -> bool {
        self.failure_kind() == Some(FailureKind::Conflict)
    }
}

/// Database-agnostic error type for storage operations.
///
/// This enum uses `String` for all error details, allowing the storage layer
/// to convert storage-specific errors (Diesel, SQLite, etc.) into this format.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to establish a database connection.
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Failed to create or configure the connection pool.
    #[error("Failed to create database pool: {0}")]
    PoolCreationFailed(String),

    /// A database query failed to execute.
    #[error("Database query failed: {0}")]
    QueryFailed(String),

    /// The requested record was not found.
    #[error("Record not found: {0}")]
    NotFound(String),

    /// A unique constraint was violated (e.g., duplicate key).
    #[error("Unique constraint violation: {0}")]
    UniqueViolation(String),

    /// A foreign key constraint was violated.
    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    /// Database migration failed.
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Internal/unexpected database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

/// Validation errors for user input and data parsing.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Required field '{0}' is missing")]
    MissingField(String),
}

// === From implementations for common error types ===

impl From<TransitionRejection> for Error {
    fn from(err: TransitionRejection) -> Self {
        Error::Workflow(WorkflowError::Transition(err))
    }
}

impl From<SignatureError> for Error {
    fn from(err: SignatureError) -> Self {
        Error::Workflow(WorkflowError::Signature(err))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Unexpected(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_workflow_errors_carry_a_kind() {
        let conflict = Error::from(WorkflowError::Conflict("stale".to_string()));
        assert!(conflict.is_conflict());

        let db = Error::from(DatabaseError::QueryFailed("locked".to_string()));
        assert_eq!(db.failure_kind(), None);

        let invalid = Error::from(ValidationError::MissingField("userId".to_string()));
        assert_eq!(invalid.failure_kind(), None);
    }
}
