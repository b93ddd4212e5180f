//! Classification of the `x-event-key` header.

/// Bitbucket event kinds the relay knows how to forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    RepositoryPush,
    PullRequestCreated,
    PullRequestMerged,
    PullRequestDeclined,
    RepositoryForked,
    Unknown,
}

impl EventKind {
    /// Classify an event-key header value.
    ///
    /// Matching is exact and case-sensitive; an absent header is `Unknown`.
    pub fn classify(event_key: Option<&str>) -> Self {
        match event_key {
            Some("repo:push") => EventKind::RepositoryPush,
            Some("pullrequest:created") => EventKind::PullRequestCreated,
            Some("pullrequest:merged") => EventKind::PullRequestMerged,
            Some("pullrequest:declined") => EventKind::PullRequestDeclined,
            Some("repo:fork") => EventKind::RepositoryForked,
            _ => EventKind::Unknown,
        }
    }

    /// The Bitbucket identifier for this kind, for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::RepositoryPush => "repo:push",
            EventKind::PullRequestCreated => "pullrequest:created",
            EventKind::PullRequestMerged => "pullrequest:merged",
            EventKind::PullRequestDeclined => "pullrequest:declined",
            EventKind::RepositoryForked => "repo:fork",
            EventKind::Unknown => "unknown",
        }
    }
}
