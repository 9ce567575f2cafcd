//! Error types for the data models

use thiserror::Error;

/// Errors produced while parsing or interpreting model values
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid media type: {0}")]
    InvalidMediaType(String),

    #[error("more than one {0} variant present")]
    ConflictingVariants(&'static str),
}

/// Result type for model operations
pub type Result<T> = std::result::Result<T, Error>;
