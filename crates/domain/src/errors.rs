//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Error)]
pub enum DomainError {
    /// A required field was missing or empty
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),
}
