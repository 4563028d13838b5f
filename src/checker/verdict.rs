use std::fmt::{Display, Formatter};

use crate::github::CommitSha;

/// Name under which the status is reported on the commit.
pub const STATUS_CONTEXT: &str = "probot/pr-issue";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusState {
    Pending,
    Success,
    Failure,
}

impl Display for StatusState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            StatusState::Pending => "pending",
            StatusState::Success => "success",
            StatusState::Failure => "failure",
        })
    }
}

/// A commit status reported by the checker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusVerdict {
    pub state: StatusState,
    pub description: String,
    pub target_sha: CommitSha,
    pub context: &'static str,
}

impl StatusVerdict {
    pub fn new(state: StatusState, description: &str, target_sha: CommitSha) -> Self {
        Self {
            state,
            description: description.to_string(),
            target_sha,
            context: STATUS_CONTEXT,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.state != StatusState::Pending
    }
}
