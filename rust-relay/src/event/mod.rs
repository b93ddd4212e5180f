//! Bitbucket event classification and payload types.

pub mod kind;
pub mod payload;

pub use kind::EventKind;
pub use payload::{ForkEvent, PullRequestEvent, PushEvent};
