//! Error types for pep740-bundle

use thiserror::Error;

/// Errors that can occur in bundle operations
#[derive(Debug, Error)]
pub enum Error {
    /// Validation error
    #[error("bundle validation failed: {0}")]
    Validation(String),
}

/// Result type for bundle operations
pub type Result<T> = std::result::Result<T, Error>;
