use thiserror::Error;
use serde::Serialize;

/// Failures surfaced by the assistant.
///
/// Every variant renders inline in the panel via its `Display` text; none of
/// them is ever propagated to the page.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "message")]
pub enum AppError {
    /// Missing or placeholder credential
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Transport error: {0}")]
    Transport(String),

    /// Non-success HTTP status from the completion endpoint
    #[error("API request failed: {status} {reason}")]
    BadStatus { status: u16, reason: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Speech unavailable: {0}")]
    SpeechUnavailable(String),

    /// An expected panel element is gone (e.g. the result region was replaced)
    #[error("DOM unavailable: {0}")]
    DomUnavailable(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// The controller task is no longer running
    #[error("Assistant has shut down")]
    Shutdown,
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::MalformedResponse(format!("JSON error: {}", err))
    }
}

pub type AppResult<T> = Result<T, AppError>;
