//! Discord side of the relay: message format and delivery.

pub mod forwarder;
pub mod message;

pub use forwarder::{Delivery, DiscordForwarder, ForwardError, Forwarder};
pub use message::{Embed, EmbedField, OutboundMessage};
