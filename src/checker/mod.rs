use axum::async_trait;

use crate::config::RepositoryConfig;
use crate::github::{GithubRepoName, Label, PullRequestNumber};

pub mod evaluate;
pub mod event;
mod handlers;
mod process;
pub mod reference;
pub mod verdict;

use crate::checker::event::PullRequestEvent;
pub use evaluate::{evaluate, evaluate_with, pending_verdict};
pub use handlers::handle_pr_issue_event;
pub use process::{create_check_process, CheckProcess};
pub use verdict::{StatusState, StatusVerdict, STATUS_CONTEXT};

/// Provides functionality for working with a remote repository.
#[async_trait]
pub trait RepositoryClient: Send + Sync {
    fn repository(&self) -> &GithubRepoName;

    /// Load the repository configuration, falling back to the default one when the repository
    /// does not have a configuration file.
    async fn load_config(&self) -> anyhow::Result<RepositoryConfig>;

    /// Return all labels currently attached to the given pull request.
    async fn get_labels(&self, pr: PullRequestNumber) -> anyhow::Result<Vec<Label>>;

    /// Report a commit status.
    async fn create_status(&self, verdict: &StatusVerdict) -> anyhow::Result<()>;
}

/// Creates repository clients for incoming events.
/// It is behind a trait to allow easier mocking in tests.
#[async_trait]
pub trait RepositoryClientLoader: Send + Sync {
    type Client: RepositoryClient;

    async fn client_for(&self, event: &PullRequestEvent) -> anyhow::Result<Self::Client>;
}
