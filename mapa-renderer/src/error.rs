//! Renderer error types.

use thiserror::Error;

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors that can occur during rendering.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Serialized markup could not be parsed back for rasterization.
    #[error("SVG parsing failed: {0}")]
    Svg(String),

    /// No rasterization surface could be allocated.
    #[error("Surface error: {0}")]
    Surface(String),

    /// Encoding the rendered frame failed.
    #[error("Export failed: {0}")]
    Export(String),

    /// A backend was asked for output before it rendered anything.
    #[error("No frame rendered yet")]
    NoFrame,
}
