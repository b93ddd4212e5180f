//! Relay orchestration.
//!
//! ## Processing Flow
//!
//! ```text
//! secrets → signature → classification → transform → forward → response
//! ```
//!
//! Each gate exits early with a [`RelayError`]; [`Relay::handle`] turns the
//! outcome into exactly one [`RelayResponse`].

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use axum::{
    body::Bytes,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde_json::Value;
use tracing::{error, info, warn};

use crate::discord::Forwarder;
use crate::error::RelayError;
use crate::event::EventKind;
use crate::transform::transform;
use crate::web::signature::verify_signature;

/// Header carrying the Bitbucket event identifier.
pub const X_EVENT_KEY: &str = "x-event-key";

/// Header carrying the `sha256=<hex>` body signature.
pub const X_HUB_SIGNATURE: &str = "x-hub-signature";

// =============================================================================
// Inputs
// =============================================================================

/// Secrets for one invocation, supplied by the host environment.
///
/// Empty values count as missing.
#[derive(Clone, Default)]
pub struct Secrets {
    signing_key: Option<String>,
    destination_url: Option<String>,
}

impl Secrets {
    pub fn new(signing_key: Option<String>, destination_url: Option<String>) -> Self {
        Self {
            signing_key: signing_key.filter(|s| !s.is_empty()),
            destination_url: destination_url.filter(|s| !s.is_empty()),
        }
    }

    /// Both secrets, or a configuration error naming the first missing one.
    fn require(&self) -> Result<(&str, &str), RelayError> {
        let signing_key = self
            .signing_key
            .as_deref()
            .ok_or(RelayError::Configuration("BITBUCKET_KEY"))?;
        let destination_url = self
            .destination_url
            .as_deref()
            .ok_or(RelayError::Configuration("DISCORD_URL"))?;
        Ok((signing_key, destination_url))
    }
}

impl fmt::Debug for Secrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secrets")
            .field("signing_key_set", &self.signing_key.is_some())
            .field("destination_url_set", &self.destination_url.is_some())
            .finish()
    }
}

/// Request body as handed to the relay.
#[derive(Debug, Clone)]
pub enum RequestBody {
    /// The exact bytes received on the wire.
    Raw(Bytes),
    /// A body the host already decoded. Its signature is checked against the
    /// compact re-serialization, which only matches senders that emit compact
    /// JSON with the same key order.
    Parsed(Value),
}

impl RequestBody {
    /// Bytes the signature is computed over.
    fn canonical(&self) -> Result<Cow<'_, [u8]>, RelayError> {
        match self {
            RequestBody::Raw(bytes) => Ok(Cow::Borrowed(bytes.as_ref())),
            RequestBody::Parsed(value) => serde_json::to_vec(value)
                .map(Cow::Owned)
                .map_err(|_| RelayError::Authentication("body_not_serializable")),
        }
    }
}

/// One inbound webhook call.
#[derive(Debug, Clone)]
pub struct InboundRequest {
    pub headers: HeaderMap,
    pub body: RequestBody,
}

impl InboundRequest {
    pub fn new(headers: HeaderMap, body: RequestBody) -> Self {
        Self { headers, body }
    }

    /// A header value, if present and valid UTF-8.
    fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

// =============================================================================
// Output
// =============================================================================

/// Terminal status and plain-text body for the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayResponse {
    pub status: StatusCode,
    pub body: String,
}

impl RelayResponse {
    pub fn success() -> Self {
        Self {
            status: StatusCode::OK,
            body: "Success".to_string(),
        }
    }
}

impl From<RelayError> for RelayResponse {
    fn from(err: RelayError) -> Self {
        Self {
            status: err.status(),
            body: err.public_message(),
        }
    }
}

impl IntoResponse for RelayResponse {
    fn into_response(self) -> Response {
        (self.status, self.body).into_response()
    }
}

// =============================================================================
// Relay
// =============================================================================

/// Authenticates, transforms and forwards Bitbucket events.
///
/// Holds no per-request state; clones share the forwarder.
#[derive(Clone)]
pub struct Relay {
    forwarder: Arc<dyn Forwarder>,
}

impl Relay {
    pub fn new(forwarder: Arc<dyn Forwarder>) -> Self {
        Self { forwarder }
    }

    /// Process a request and map the outcome to a response. Never fails.
    pub async fn handle(&self, secrets: &Secrets, request: &InboundRequest) -> RelayResponse {
        match self.process(secrets, request).await {
            Ok(kind) => {
                info!(event = kind.as_str(), "relay_success");
                RelayResponse::success()
            }
            Err(err) => {
                match &err {
                    RelayError::Configuration(missing) => {
                        error!(missing = missing, "relay_configuration_missing")
                    }
                    RelayError::Authentication(reason) => {
                        warn!(reason = reason, "relay_signature_invalid")
                    }
                    RelayError::UnsupportedEvent(key) => {
                        warn!(event_key = %key, "relay_event_unsupported")
                    }
                    RelayError::Forwarding { status_text } => {
                        error!(status_text = %status_text, "relay_forward_rejected")
                    }
                    RelayError::Transform(_) | RelayError::Unexpected(_) => {
                        error!(error = %err, "relay_internal_error")
                    }
                }
                err.into()
            }
        }
    }

    /// Run the relay pipeline, returning the relayed event kind.
    pub async fn process(
        &self,
        secrets: &Secrets,
        request: &InboundRequest,
    ) -> Result<EventKind, RelayError> {
        let (signing_key, destination_url) = secrets.require()?;

        let signature = request
            .header(X_HUB_SIGNATURE)
            .ok_or(RelayError::Authentication("signature_header_missing"))?;
        let event_key = request
            .header(X_EVENT_KEY)
            .ok_or(RelayError::Authentication("event_header_missing"))?;

        let body = request.body.canonical()?;
        if !verify_signature(&body, signature, signing_key) {
            return Err(RelayError::Authentication("signature_mismatch"));
        }

        let kind = EventKind::classify(Some(event_key));
        if kind == EventKind::Unknown {
            return Err(RelayError::UnsupportedEvent(event_key.to_string()));
        }

        let message = transform(kind, &body)?;

        let delivery = self
            .forwarder
            .forward(destination_url, &message)
            .await
            .map_err(|e| RelayError::Unexpected(e.to_string()))?;

        if !delivery.delivered {
            return Err(RelayError::Forwarding {
                status_text: delivery.status_text,
            });
        }

        Ok(kind)
    }
}
