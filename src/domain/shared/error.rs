//! Domain errors

use thiserror::Error;

/// Domain result type
pub type Result<T> = std::result::Result<T, DomainError>;

/// Failure conditions inside the call-preparation core.
///
/// None of these is fatal: services turn them into a lower capability tier
/// and a human-readable message instead of propagating them to callers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Configuration missing: {0}")]
    ConfigurationMissing(String),

    #[error("Network unavailable: {0}")]
    NetworkUnavailable(String),

    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
