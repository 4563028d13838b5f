use octocrab::models::InstallationId;

use crate::github::{CommitSha, GithubRepoName, GithubUser, PullRequestNumber};

#[derive(Debug)]
pub enum PrIssueEvent {
    /// A pull request was opened or changed in a way that may affect its issue reference.
    PullRequest(PullRequestEvent),
}

impl PrIssueEvent {
    pub fn repository(&self) -> &GithubRepoName {
        match self {
            PrIssueEvent::PullRequest(event) => &event.repository,
        }
    }
}

/// Pull request actions that trigger a check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PullRequestAction {
    Opened,
    Edited,
    Labeled,
    Unlabeled,
    Synchronize,
}

impl PullRequestAction {
    /// Returns `None` for actions that do not trigger a check (e.g. `closed`).
    pub fn parse(action: &str) -> Option<Self> {
        match action {
            "opened" => Some(Self::Opened),
            "edited" => Some(Self::Edited),
            "labeled" => Some(Self::Labeled),
            "unlabeled" => Some(Self::Unlabeled),
            "synchronize" => Some(Self::Synchronize),
            _ => None,
        }
    }
}

/// Snapshot of a pull request at the time the webhook was sent.
#[derive(Clone, Debug)]
pub struct PullRequestEvent {
    pub repository: GithubRepoName,
    /// Installation of the GitHub App that received the event.
    pub installation: Option<InstallationId>,
    pub action: PullRequestAction,
    pub pr_number: PullRequestNumber,
    pub author: GithubUser,
    pub head_sha: CommitSha,
    pub body: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::PullRequestAction;

    #[test]
    fn parse_checked_actions() {
        assert_eq!(
            PullRequestAction::parse("opened"),
            Some(PullRequestAction::Opened)
        );
        assert_eq!(
            PullRequestAction::parse("synchronize"),
            Some(PullRequestAction::Synchronize)
        );
    }

    #[test]
    fn parse_ignored_actions() {
        assert_eq!(PullRequestAction::parse("closed"), None);
        assert_eq!(PullRequestAction::parse("reopened"), None);
        assert_eq!(PullRequestAction::parse("Opened"), None);
    }
}
