//! Client error types.

use thiserror::Error;

/// Result type for layout-service client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur when talking to the layout service.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The base URL provided is invalid.
    #[error("invalid layout service URL: {0}")]
    InvalidUrl(String),
    /// A URL returned by the service could not be parsed.
    #[error("invalid URL in layout service response: {0}")]
    Url(#[from] url::ParseError),
    /// HTTP layer failed (connection, timeout, etc.).
    #[error("layout service HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// JSON encoding or parsing failed.
    #[error("failed to parse layout service payload: {0}")]
    Json(#[from] serde_json::Error),
    /// Reading the drawing or writing the artifact failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The service rejected the request.
    #[error("layout service error (HTTP {status}): {message}")]
    Service {
        /// HTTP status code.
        status: u16,
        /// Message provided by the service.
        message: String,
    },
    /// The response did not match the expected structure.
    #[error("unexpected layout service response: {0}")]
    UnexpectedResponse(String),
    /// The current view could not be rasterized.
    #[error("capture failed: no rasterization surface available")]
    Capture,
    /// The drawing returned by the service is unusable.
    #[error(transparent)]
    Core(#[from] mapa_core::CoreError),
}

impl ClientError {
    /// Returns true if this error is retryable (transient HTTP failures).
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(_) => true,
            Self::Service { status, .. } => *status >= 500,
            _ => false,
        }
    }
}
