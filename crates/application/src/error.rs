//! Application-level errors

use domain::DomainError;
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Requested data does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Document store or other external service failed
    #[error("External service error: {0}")]
    ExternalService(String),
}
