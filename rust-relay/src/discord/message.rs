//! Discord webhook message format.
//!
//! Reference: https://discord.com/developers/docs/resources/webhook#execute-webhook
//!
//! Constructors clamp every string to Discord's documented limits, since Discord
//! rejects the whole message when a single field is too long.

use serde::Serialize;

const MAX_CONTENT: usize = 2000;
const MAX_TITLE: usize = 256;
const MAX_DESCRIPTION: usize = 4096;
const MAX_FIELD_NAME: usize = 256;
const MAX_FIELD_VALUE: usize = 1024;
/// Combined length of title, description and all field names and values.
const MAX_EMBED_TOTAL: usize = 6000;

/// Body of an execute-webhook request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutboundMessage {
    pub content: String,
    pub embeds: Vec<Embed>,
}

impl OutboundMessage {
    pub fn new(content: impl Into<String>, embeds: Vec<Embed>) -> Self {
        Self {
            content: clamp(content.into(), MAX_CONTENT),
            embeds,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Embed {
    pub title: String,
    pub description: String,
    pub fields: Vec<EmbedField>,
}

impl Embed {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        fields: Vec<EmbedField>,
    ) -> Self {
        let title = clamp(title.into(), MAX_TITLE);
        let used = title.chars().count()
            + fields
                .iter()
                .map(|f| f.name.chars().count() + f.value.chars().count())
                .sum::<usize>();
        // The description absorbs whatever the title and fields leave over.
        let budget = MAX_DESCRIPTION.min(MAX_EMBED_TOTAL.saturating_sub(used)).max(1);

        Self {
            title,
            description: clamp(description.into(), budget),
            fields,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

impl EmbedField {
    pub fn new(name: impl Into<String>, value: impl Into<String>, inline: bool) -> Self {
        Self {
            name: clamp(name.into(), MAX_FIELD_NAME),
            value: clamp(value.into(), MAX_FIELD_VALUE),
            inline,
        }
    }
}

/// Cut `text` to at most `max` chars, ending with `…` when shortened.
fn clamp(text: String, max: usize) -> String {
    if text.chars().count() <= max {
        text
    } else {
        text.chars().take(max - 1).collect::<String>() + "…"
    }
}
