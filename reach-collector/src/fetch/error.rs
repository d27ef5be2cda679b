//! Fetch error types.

use std::time::Duration;

/// Errors from a single fetch attempt, and the error a fetch reports once
/// its retries are exhausted.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Connection or transport failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-2xx status
    #[error("API error {status}: {message}")]
    Status { status: u16, message: String },

    /// Body was not the expected JSON
    #[error("JSON parse error: {message}{}", .body.as_deref().map(|b| format!(" (body: {b})")).unwrap_or_default())]
    Json {
        message: String,
        body: Option<String>,
    },

    /// Attempt exceeded its timeout and was cancelled
    #[error("request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    /// Endpoint URL could not be parsed
    #[error("invalid URL {url:?}: {message}")]
    InvalidUrl { url: String, message: String },

    /// No recorded response for this request
    #[error("no recorded response for {0}")]
    NotFound(String),

    /// Recorded responses could not be loaded
    #[error("replay data error: {0}")]
    Replay(String),
}
