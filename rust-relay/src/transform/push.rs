//! `repo:push` transformer.

use crate::discord::{Embed, EmbedField, OutboundMessage};
use crate::event::payload::{display_name_of, Change};
use crate::event::PushEvent;

/// Build the Discord message for a push.
///
/// Only the first ref change is shown. A push without any change is still
/// rendered, with an empty branch and no commits.
pub fn transform_push(event: &PushEvent) -> OutboundMessage {
    let fallback = Change::default();
    let change = event.push.changes.first().unwrap_or(&fallback);
    let branch = change.branch_name();
    let repository = &event.repository;

    let commit_lines = change
        .commits()
        .iter()
        .map(|commit| format!("- [{}]({})", commit.summary(), commit.links.html_href()))
        .collect::<Vec<_>>()
        .join("\n");

    let embed = Embed::new(
        "Push Event",
        format!("Branch: {}\nCommits:\n{}", branch, commit_lines),
        vec![
            EmbedField::new("Repository", repository.markdown_link(), false),
            EmbedField::new("Author", display_name_of(event.actor.as_ref()), false),
        ],
    );

    OutboundMessage::new(
        format!(
            "New push event on branch **{}** in repository **{}**",
            branch,
            repository.full_name()
        ),
        vec![embed],
    )
}
