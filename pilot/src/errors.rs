//! Error types for coolify-pilot

use thiserror::Error;

/// Main error type for coolify-pilot
#[derive(Error, Debug)]
pub enum PilotError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("API request failed ({status}): {status_text}")]
    RequestFailed { status: u16, status_text: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl PilotError {
    /// Build a `RequestFailed` from a non-success HTTP status
    pub fn request_failed(status: reqwest::StatusCode) -> Self {
        PilotError::RequestFailed {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or("Unknown").to_string(),
        }
    }

    /// The error raised when no server URL or token is available
    pub fn not_configured() -> Self {
        PilotError::ConfigError(
            "Coolify is not configured. Run `coolify-pilot configure` first.".to_string(),
        )
    }
}

/// A failure the user has already been notified about.
///
/// Commands return it so the process exits non-zero without printing the
/// outcome a second time.
#[derive(Error, Debug)]
#[error("{0}")]
pub struct AlreadyReported(pub String);

impl From<anyhow::Error> for PilotError {
    fn from(err: anyhow::Error) -> Self {
        PilotError::Internal(err.to_string())
    }
}
