//! Bitbucket webhook payload types.
//!
//! Only the fields the transformers display are modelled. Objects the event
//! kind guarantees (`repository`, `push`, `pullrequest`, `fork`) are required, so
//! deserialization fails if they are absent. Every display field is optional and
//! resolved through an accessor that documents its default.

use serde::{Deserialize, Deserializer};

/// Placeholder for a commit without a usable message.
pub const EMPTY_COMMIT_MESSAGE: &str = "-";

/// Read an explicit `null` the same way as a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// =============================================================================
// Shared Types
// =============================================================================

/// `{ "href": ... }` link object.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Link {
    #[serde(default)]
    pub href: Option<String>,
}

/// `links` object; only the browser link is used.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Links {
    #[serde(default)]
    pub html: Option<Link>,
}

impl Links {
    /// Browser URL, or `""` when absent.
    pub fn html_href(&self) -> &str {
        self.html
            .as_ref()
            .and_then(|link| link.href.as_deref())
            .unwrap_or("")
    }
}

/// A Bitbucket user or team.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Account {
    #[serde(default)]
    pub display_name: Option<String>,
}

impl Account {
    /// Display name, or `""` when absent.
    pub fn display_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or("")
    }
}

/// Display name of an optional account, or `""`.
pub fn display_name_of(account: Option<&Account>) -> &str {
    account.map(Account::display_name).unwrap_or("")
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Repository {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub links: Links,
}

impl Repository {
    /// `workspace/slug`, or `""` when absent.
    pub fn full_name(&self) -> &str {
        self.full_name.as_deref().unwrap_or("")
    }

    /// Markdown link `[full_name](href)`.
    pub fn markdown_link(&self) -> String {
        format!("[{}]({})", self.full_name(), self.links.html_href())
    }
}

// =============================================================================
// repo:push
// =============================================================================

/// Body of a `repo:push` event.
#[derive(Debug, Clone, Deserialize)]
pub struct PushEvent {
    #[serde(default)]
    pub actor: Option<Account>,
    pub repository: Repository,
    pub push: Push,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Push {
    #[serde(default, deserialize_with = "null_as_default")]
    pub changes: Vec<Change>,
}

/// One ref update within a push.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Change {
    /// State of the ref after the push; absent when the ref was deleted.
    #[serde(default)]
    pub new: Option<RefState>,
    #[serde(default)]
    pub commits: Option<Vec<Commit>>,
}

impl Change {
    /// Branch name after the push, or `""` when the ref was deleted.
    pub fn branch_name(&self) -> &str {
        self.new
            .as_ref()
            .and_then(|state| state.name.as_deref())
            .unwrap_or("")
    }

    /// Pushed commits, or an empty slice when absent.
    pub fn commits(&self) -> &[Commit] {
        self.commits.as_deref().unwrap_or(&[])
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RefState {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Commit {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub links: Links,
}

impl Commit {
    /// Trimmed commit message, or [`EMPTY_COMMIT_MESSAGE`] when absent or blank.
    pub fn summary(&self) -> &str {
        match self.message.as_deref().map(str::trim) {
            Some(message) if !message.is_empty() => message,
            _ => EMPTY_COMMIT_MESSAGE,
        }
    }
}

// =============================================================================
// pullrequest:created / merged / declined
// =============================================================================

/// Body of the `pullrequest:*` events.
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestEvent {
    #[serde(default)]
    pub actor: Option<Account>,
    pub repository: Repository,
    pub pullrequest: PullRequest,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PullRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<Account>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub links: Links,
    #[serde(default)]
    pub source: Option<PullRequestEndpoint>,
    #[serde(default)]
    pub destination: Option<PullRequestEndpoint>,
}

impl PullRequest {
    /// Title, or `""` when absent.
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }

    pub fn source_branch(&self) -> &str {
        self.source.as_ref().map(PullRequestEndpoint::branch_name).unwrap_or("")
    }

    pub fn destination_branch(&self) -> &str {
        self.destination
            .as_ref()
            .map(PullRequestEndpoint::branch_name)
            .unwrap_or("")
    }
}

/// Source or destination side of a pull request.
///
/// Bitbucket nests the branch as `{ "branch": { "name": ... } }`; some senders
/// flatten it to `{ "name": ... }`, so both are accepted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PullRequestEndpoint {
    #[serde(default)]
    pub branch: Option<Branch>,
    #[serde(default)]
    pub name: Option<String>,
}

impl PullRequestEndpoint {
    /// `branch.name`, then `name`, then `""`.
    pub fn branch_name(&self) -> &str {
        self.branch
            .as_ref()
            .and_then(|branch| branch.name.as_deref())
            .or(self.name.as_deref())
            .unwrap_or("")
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Branch {
    #[serde(default)]
    pub name: Option<String>,
}

// =============================================================================
// repo:fork
// =============================================================================

/// Body of a `repo:fork` event. `repository` is the original, `fork` the copy.
#[derive(Debug, Clone, Deserialize)]
pub struct ForkEvent {
    #[serde(default)]
    pub actor: Option<Account>,
    pub repository: Repository,
    pub fork: Repository,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_push_event_defaults() {
        let event: PushEvent = serde_json::from_value(json!({
            "repository": {},
            "push": { "changes": [{}] }
        }))
        .unwrap();

        let change = &event.push.changes[0];
        assert_eq!(change.branch_name(), "");
        assert!(change.commits().is_empty());
        assert_eq!(display_name_of(event.actor.as_ref()), "");
        assert_eq!(event.repository.markdown_link(), "[]()");
    }

    #[test]
    fn test_push_event_requires_push() {
        let result = serde_json::from_value::<PushEvent>(json!({ "repository": {} }));
        assert!(result.is_err());
    }

    #[test]
    fn test_commit_summary() {
        let commit = |message: Option<&str>| Commit {
            message: message.map(str::to_string),
            links: Links::default(),
        };

        assert_eq!(commit(Some("  fix bug\n")).summary(), "fix bug");
        assert_eq!(commit(Some("")).summary(), "-");
        assert_eq!(commit(Some(" \n ")).summary(), "-");
        assert_eq!(commit(None).summary(), "-");
    }

    #[test]
    fn test_pull_request_branch_shapes() {
        let pr: PullRequest = serde_json::from_value(json!({
            "source": { "branch": { "name": "feature/x" } },
            "destination": { "name": "main" }
        }))
        .unwrap();

        assert_eq!(pr.source_branch(), "feature/x");
        assert_eq!(pr.destination_branch(), "main");
        assert_eq!(pr.title(), "");
    }

    #[test]
    fn test_ignores_null_display_fields() {
        let repo: Repository = serde_json::from_value(json!({
            "full_name": null,
            "links": { "html": null }
        }))
        .unwrap();

        assert_eq!(repo.full_name(), "");
        assert_eq!(repo.links.html_href(), "");
    }

    #[test]
    fn test_null_links_and_changes_use_defaults() {
        let fork: ForkEvent = serde_json::from_value(json!({
            "repository": { "full_name": "team/app", "links": null },
            "fork": { "full_name": "someone/app", "links": null }
        }))
        .unwrap();
        assert_eq!(fork.repository.markdown_link(), "[team/app]()");
        assert_eq!(fork.fork.links.html_href(), "");

        let push: PushEvent = serde_json::from_value(json!({
            "repository": {},
            "push": { "changes": null }
        }))
        .unwrap();
        assert!(push.push.changes.is_empty());

        let change: Change = serde_json::from_value(json!({
            "commits": [{ "message": "fix", "links": null }]
        }))
        .unwrap();
        assert_eq!(change.commits()[0].links.html_href(), "");

        let pr: PullRequest = serde_json::from_value(json!({ "links": null })).unwrap();
        assert_eq!(pr.links.html_href(), "");
    }
}
