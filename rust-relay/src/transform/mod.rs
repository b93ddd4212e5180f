//! Bitbucket payload → Discord message transformers.
//!
//! ## Processing Flow
//!
//! ```text
//! EventKind + body → transform() → typed payload → transform_*() → OutboundMessage
//! ```
//!
//! The `transform_*` functions are pure and total over their typed payloads;
//! the only failure is a body that does not decode as the classified kind.

pub mod fork;
pub mod pull_request;
pub mod push;

use serde::de::DeserializeOwned;
use tracing::{info, warn};

use crate::discord::OutboundMessage;
use crate::error::RelayError;
use crate::event::EventKind;

pub use fork::transform_fork;
pub use pull_request::{transform_pull_request, PullRequestAction};
pub use push::transform_push;

/// Transform a classified event body into a Discord message.
pub fn transform(kind: EventKind, body: &[u8]) -> Result<OutboundMessage, RelayError> {
    let message = match kind {
        EventKind::RepositoryPush => transform_push(&decode(kind, body)?),
        EventKind::PullRequestCreated => {
            transform_pull_request(&decode(kind, body)?, PullRequestAction::Created)
        }
        EventKind::PullRequestMerged => {
            transform_pull_request(&decode(kind, body)?, PullRequestAction::Merged)
        }
        EventKind::PullRequestDeclined => {
            transform_pull_request(&decode(kind, body)?, PullRequestAction::Declined)
        }
        EventKind::RepositoryForked => transform_fork(&decode(kind, body)?),
        EventKind::Unknown => return Err(RelayError::UnsupportedEvent(kind.as_str().to_string())),
    };

    info!(
        event = kind.as_str(),
        content_length = message.content.len(),
        "transform_complete"
    );

    Ok(message)
}

fn decode<T: DeserializeOwned>(kind: EventKind, body: &[u8]) -> Result<T, RelayError> {
    serde_json::from_slice(body).map_err(|e| {
        warn!(event = kind.as_str(), error = %e, "transform_payload_invalid");
        RelayError::Transform(format!("{} payload: {}", kind.as_str(), e))
    })
}
