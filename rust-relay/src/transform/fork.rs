//! `repo:fork` transformer.

use crate::discord::{Embed, EmbedField, OutboundMessage};
use crate::event::payload::display_name_of;
use crate::event::ForkEvent;

/// Build the Discord message for a fork.
pub fn transform_fork(event: &ForkEvent) -> OutboundMessage {
    let embed = Embed::new(
        "Repository Fork",
        format!("[View Repository]({})", event.repository.links.html_href()),
        vec![
            EmbedField::new("Source Repository", event.repository.markdown_link(), true),
            EmbedField::new("Forked Repository", event.fork.markdown_link(), true),
        ],
    );

    OutboundMessage::new(
        format!(
            "Repository **forked** by **{}**",
            display_name_of(event.actor.as_ref())
        ),
        vec![embed],
    )
}
