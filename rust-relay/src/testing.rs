//! Shared fixtures for unit tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::http::{HeaderMap, HeaderValue};
use serde_json::{json, Value};

use crate::discord::{Delivery, ForwardError, Forwarder, OutboundMessage};
use crate::relay::{X_EVENT_KEY, X_HUB_SIGNATURE};
use crate::web::signature::sign_body;

pub const SECRET: &str = "test-secret";
pub const DESTINATION: &str = "https://discord.test/api/webhooks/1/token";

/// Forwarder that records every message and answers with a fixed delivery,
/// or fails every call when built with [`RecordingForwarder::failing`].
#[derive(Clone)]
pub struct RecordingForwarder {
    pub sent: Arc<Mutex<Vec<(String, OutboundMessage)>>>,
    delivery: Delivery,
    fail: bool,
}

impl RecordingForwarder {
    pub fn accepting() -> Self {
        Self::answering(true, "No Content")
    }

    pub fn answering(delivered: bool, status_text: &str) -> Self {
        Self {
            sent: Arc::default(),
            delivery: Delivery {
                delivered,
                status_text: status_text.to_string(),
            },
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::accepting()
        }
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl Forwarder for RecordingForwarder {
    async fn forward(
        &self,
        destination: &str,
        message: &OutboundMessage,
    ) -> Result<Delivery, ForwardError> {
        self.sent
            .lock()
            .unwrap()
            .push((destination.to_string(), message.clone()));

        if self.fail {
            let cause = serde_json::from_str::<Value>("{broken").unwrap_err();
            return Err(ForwardError::Encode(cause));
        }
        Ok(self.delivery.clone())
    }
}

pub fn push_body() -> Value {
    json!({
        "actor": { "display_name": "Ada Lovelace" },
        "repository": {
            "full_name": "team/app",
            "links": { "html": { "href": "https://bitbucket.org/team/app" } }
        },
        "push": {
            "changes": [{
                "new": { "name": "main" },
                "commits": [
                    {
                        "message": "fix bug",
                        "links": { "html": { "href": "https://bitbucket.org/team/app/commits/a1" } }
                    },
                    {
                        "message": "",
                        "links": { "html": { "href": "https://bitbucket.org/team/app/commits/b2" } }
                    }
                ]
            }]
        }
    })
}

/// Headers for `body` signed with [`SECRET`].
pub fn signed_headers(event_key: &str, body: &[u8]) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(X_EVENT_KEY, HeaderValue::from_str(event_key).unwrap());
    headers.insert(
        X_HUB_SIGNATURE,
        HeaderValue::from_str(&sign_body(body, SECRET).unwrap()).unwrap(),
    );
    headers
}
