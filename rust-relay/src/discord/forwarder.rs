//! Delivery of relayed messages to a Discord webhook.

use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Client};
use thiserror::Error;
use tracing::{error, info, warn};

use super::message::OutboundMessage;

/// Outcome of a completed delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    /// Whether the destination answered with a 2xx status.
    pub delivered: bool,
    /// Reason phrase of the destination's status.
    pub status_text: String,
}

/// The delivery attempt itself failed, before any status was received.
#[derive(Debug, Error)]
pub enum ForwardError {
    #[error("failed to encode message: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("request to destination failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// Sends an [`OutboundMessage`] to a destination URL.
#[async_trait]
pub trait Forwarder: Send + Sync {
    async fn forward(
        &self,
        destination: &str,
        message: &OutboundMessage,
    ) -> Result<Delivery, ForwardError>;
}

/// [`Forwarder`] posting JSON to a Discord webhook over HTTP.
///
/// One POST per message, no retries and no timeout beyond the client's default.
#[derive(Clone, Default)]
pub struct DiscordForwarder {
    client: Client,
}

impl DiscordForwarder {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Forwarder for DiscordForwarder {
    async fn forward(
        &self,
        destination: &str,
        message: &OutboundMessage,
    ) -> Result<Delivery, ForwardError> {
        let body = serde_json::to_vec(message)?;

        info!(
            body_length = body.len(),
            embeds = message.embeds.len(),
            "discord_forward_starting"
        );

        let response = match self
            .client
            .post(destination)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => {
                // The webhook URL embeds its token.
                let e = e.without_url();
                if e.is_timeout() {
                    error!(error = %e, "discord_forward_timeout");
                } else {
                    error!(error = %e, "discord_forward_request_error");
                }
                return Err(e.into());
            }
        };

        let status = response.status();
        let delivered = status.is_success();
        let status_text = status.canonical_reason().unwrap_or("").to_string();

        if delivered {
            info!(status_code = status.as_u16(), "discord_forward_complete");
        } else {
            warn!(
                status_code = status.as_u16(),
                status_text = %status_text,
                "discord_forward_rejected"
            );
        }

        Ok(Delivery {
            delivered,
            status_text,
        })
    }
}
