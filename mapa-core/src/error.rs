//! Error types for viewer core operations.

use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur while loading or serializing drawing data.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Drawing document could not be parsed or serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The parser collaborator reported an error instead of entities.
    #[error("Drawing rejected by parser: {0}")]
    Drawing(String),
}
