//! Bitbucket → Discord webhook relay.
//!
//! Receives signed Bitbucket webhooks, verifies them, and posts a matching
//! Discord message to a single configured webhook.
//!
//! ## Architecture
//!
//! ```text
//! Bitbucket → web (axum) → relay → signature → event → transform → discord
//! ```

pub mod config;
pub mod discord;
pub mod error;
pub mod event;
pub mod relay;
pub mod transform;
pub mod web;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use config::Config;
pub use discord::{DiscordForwarder, Forwarder, OutboundMessage};
pub use error::RelayError;
pub use event::EventKind;
pub use relay::{InboundRequest, Relay, RelayResponse, RequestBody, Secrets};
pub use web::{router, AppState};
