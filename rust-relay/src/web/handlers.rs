//! Webhook endpoint handlers.
//!
//! The handlers only adapt axum's request parts to the relay. All decisions
//! (authentication, classification, status codes) live in [`crate::relay`].

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::info;

use crate::relay::{InboundRequest, Relay, RequestBody, X_EVENT_KEY};
use crate::Config;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub relay: Relay,
}

impl AppState {
    pub fn new(config: Config, relay: Relay) -> Self {
        Self {
            config: Arc::new(config),
            relay,
        }
    }
}

// =============================================================================
// Health Check
// =============================================================================

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

// =============================================================================
// Bitbucket Webhook
// =============================================================================

/// Bitbucket webhook endpoint.
///
/// The body is taken as raw bytes so the signature is checked against exactly
/// what Bitbucket signed.
pub async fn bitbucket_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    info!(
        event_key = headers
            .get(X_EVENT_KEY)
            .and_then(|v| v.to_str().ok())
            .unwrap_or(""),
        request_uuid = headers
            .get("x-request-uuid")
            .and_then(|v| v.to_str().ok())
            .unwrap_or(""),
        body_length = body.len(),
        "bitbucket_webhook_received"
    );

    let request = InboundRequest::new(headers, RequestBody::Raw(body));
    let response = state.relay.handle(&state.config.secrets(), &request).await;

    info!(status = response.status.as_u16(), "bitbucket_webhook_complete");

    response.into_response()
}

#[cfg(test)]
mod tests {
    use axum::{body::to_bytes, http::StatusCode};

    use super::*;
    use crate::relay::X_HUB_SIGNATURE;
    use crate::testing::{push_body, signed_headers, RecordingForwarder, DESTINATION, SECRET};

    fn state(forwarder: &RecordingForwarder) -> AppState {
        let config = Config {
            port: 0,
            bitbucket_key: Some(SECRET.to_string()),
            discord_url: Some(DESTINATION.to_string()),
            max_body_bytes: 1024 * 1024,
        };
        AppState::new(config, Relay::new(Arc::new(forwarder.clone())))
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let Json(response) = health().await;
        assert_eq!(response.status, "ok");
    }

    #[tokio::test]
    async fn test_bitbucket_webhook_success() {
        let forwarder = RecordingForwarder::accepting();
        let body = push_body().to_string();
        let headers = signed_headers("repo:push", body.as_bytes());

        let response =
            bitbucket_webhook(State(state(&forwarder)), headers, Bytes::from(body)).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "Success");
        assert_eq!(forwarder.sent_count(), 1);
    }

    #[tokio::test]
    async fn test_bitbucket_webhook_missing_configuration() {
        let forwarder = RecordingForwarder::accepting();
        let mut state = state(&forwarder);
        state.config = Arc::new(Config {
            discord_url: None,
            ..(*state.config).clone()
        });
        let body = push_body().to_string();
        let headers = signed_headers("repo:push", body.as_bytes());

        let response = bitbucket_webhook(State(state), headers, Bytes::from(body)).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_text(response).await, "Configuration error");
        assert_eq!(forwarder.sent_count(), 0);
    }

    #[tokio::test]
    async fn test_bitbucket_webhook_signature_over_raw_bytes() {
        let forwarder = RecordingForwarder::accepting();
        // Signed as pretty-printed JSON; must verify without re-serialization.
        let body = serde_json::to_string_pretty(&push_body()).unwrap();
        let headers = signed_headers("repo:push", body.as_bytes());

        let response =
            bitbucket_webhook(State(state(&forwarder)), headers, Bytes::from(body)).await;

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_bitbucket_webhook_bad_signature() {
        let forwarder = RecordingForwarder::accepting();
        let body = push_body().to_string();
        let mut headers = signed_headers("repo:push", body.as_bytes());
        headers.insert(X_HUB_SIGNATURE, "sha256=deadbeef".parse().unwrap());

        let response =
            bitbucket_webhook(State(state(&forwarder)), headers, Bytes::from(body)).await;

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(body_text(response).await, "Invalid signature");
        assert_eq!(forwarder.sent_count(), 0);
    }
}
