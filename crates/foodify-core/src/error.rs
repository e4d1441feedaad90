//! # AppError
//!
//! Centralized error handling for Foodify.
//! Every variant carries the message a client is allowed to see; store
//! faults are logged where they happen and reach this type already redacted.

use thiserror::Error;

/// The primary error type for all foodify-core operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// Record not found (kind, id)
    #[error("{0} not found with ID {1}")]
    NotFound(String, String),

    /// Malformed id, missing field or missing query parameter
    #[error("validation error: {0}")]
    ValidationError(String),

    /// The caller does not own the record it tries to change
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Store or driver failure
    #[error("internal service error: {0}")]
    Internal(String),
}

impl AppError {
    /// The text sent back in the `message` field.
    pub fn public_message(&self) -> String {
        match self {
            AppError::NotFound(kind, _) => format!("{kind} not found"),
            AppError::ValidationError(msg) | AppError::Forbidden(msg) | AppError::Internal(msg) => {
                msg.clone()
            }
        }
    }
}

/// A specialized Result type for Foodify logic.
pub type Result<T> = std::result::Result<T, AppError>;
