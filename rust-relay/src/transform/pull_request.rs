//! `pullrequest:created`, `pullrequest:merged` and `pullrequest:declined` transformer.

use std::fmt;

use crate::discord::{Embed, EmbedField, OutboundMessage};
use crate::event::payload::display_name_of;
use crate::event::PullRequestEvent;

/// What happened to the pull request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PullRequestAction {
    Created,
    Merged,
    Declined,
}

impl fmt::Display for PullRequestAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PullRequestAction::Created => "created",
            PullRequestAction::Merged => "merged",
            PullRequestAction::Declined => "declined",
        })
    }
}

/// Build the Discord message for a pull request event.
pub fn transform_pull_request(
    event: &PullRequestEvent,
    action: PullRequestAction,
) -> OutboundMessage {
    let pr = &event.pullrequest;

    let embed = Embed::new(
        format!("Pull Request: {}", pr.title()),
        format!(
            "Author: {}\n[View Pull Request]({})",
            display_name_of(pr.author.as_ref()),
            pr.links.html_href()
        ),
        vec![
            EmbedField::new("Source Branch", pr.source_branch(), true),
            EmbedField::new("Destination Branch", pr.destination_branch(), true),
        ],
    );

    OutboundMessage::new(
        format!(
            "Pull Request **{}** in repository **{}**",
            action,
            event.repository.full_name()
        ),
        vec![embed],
    )
}
