//! Error taxonomy for a single relay invocation.
//!
//! Every variant maps to exactly one HTTP status and one caller-facing message.
//! The messages never carry internal detail; the `Display` output (which may) is
//! only written to the logs.

use axum::http::StatusCode;
use thiserror::Error;

/// Failure of one relay invocation.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The signing key or the Discord URL is not configured.
    #[error("missing relay configuration: {0}")]
    Configuration(&'static str),

    /// Signature header absent, event header absent, or signature mismatch.
    #[error("request authentication failed: {0}")]
    Authentication(&'static str),

    /// The `x-event-key` value is not one we relay.
    #[error("unsupported event type: {0}")]
    UnsupportedEvent(String),

    /// The payload lacks a field the event kind guarantees.
    #[error("failed to transform payload: {0}")]
    Transform(String),

    /// Discord answered with a non-success status.
    #[error("discord rejected the message: {status_text}")]
    Forwarding { status_text: String },

    /// Anything else, e.g. the Discord call never completed.
    #[error("unexpected relay error: {0}")]
    Unexpected(String),
}

impl RelayError {
    /// HTTP status returned to Bitbucket.
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::Authentication(_) => StatusCode::FORBIDDEN,
            RelayError::UnsupportedEvent(_) => StatusCode::BAD_REQUEST,
            RelayError::Configuration(_)
            | RelayError::Transform(_)
            | RelayError::Forwarding { .. }
            | RelayError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Plain-text body returned to Bitbucket.
    pub fn public_message(&self) -> String {
        match self {
            RelayError::Configuration(_) => "Configuration error".to_string(),
            RelayError::Authentication(_) => "Invalid signature".to_string(),
            RelayError::UnsupportedEvent(_) => "Unsupported event type".to_string(),
            RelayError::Forwarding { status_text } => {
                format!("Failed to send message to Discord: {}", status_text)
            }
            RelayError::Transform(_) | RelayError::Unexpected(_) => {
                "Internal Server Error".to_string()
            }
        }
    }
}
