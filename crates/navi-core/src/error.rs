//! Error types for Navi.

use thiserror::Error;

/// Result type alias using Navi's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for Navi.
#[derive(Error, Debug)]
pub enum Error {
    // Queue errors
    #[error("Invalid track: {0}")]
    InvalidTrack(String),

    #[error("The play queue is empty")]
    QueueEmpty,

    #[error("There is no playback history")]
    HistoryEmpty,

    #[error("The prefetch buffer is empty")]
    BufferEmpty,

    // Catalog errors
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Failed to resolve track {id}: {source}")]
    Resolution {
        id: String,
        #[source]
        source: Box<Error>,
    },

    // Network errors
    #[error("HTTP request failed: {0}")]
    Http(#[from] HttpError),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    #[error("Subsonic API error {code}: {message}")]
    Api { code: u32, message: String },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // Generic errors
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// HTTP-specific errors.
#[derive(Error, Debug)]
pub enum HttpError {
    #[error("Request failed with status {status}: {message}")]
    StatusError { status: u16, message: String },

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl Error {
    /// Wrap a catalog error as a resolution failure for `id`.
    pub fn resolution(id: impl Into<String>, source: Self) -> Self {
        Self::Resolution {
            id: id.into(),
            source: Box::new(source),
        }
    }

    /// Returns true if this error is retryable.
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::Http(HttpError::ConnectionFailed(_) | HttpError::Timeout)
        )
    }

    /// Returns true if a pop-style queue operation found nothing to pop.
    ///
    /// Callers translate these into a neutral "nothing to play" response.
    pub const fn is_underflow(&self) -> bool {
        matches!(self, Self::QueueEmpty | Self::HistoryEmpty | Self::BufferEmpty)
    }
}
