use anyhow::Context;
use axum::async_trait;
use octocrab::Octocrab;

use crate::checker::{RepositoryClient, StatusVerdict};
use crate::config::RepositoryConfig;
use crate::github::api::operations::{create_commit_status, load_config_file};
use crate::github::{GithubRepoName, Label, PullRequestNumber};

/// Provides access to a single repository of an app installation using the GitHub API.
pub struct GithubRepositoryClient {
    /// The client caches the access token for the installation and refreshes it once it
    /// expires.
    pub client: Octocrab,
    pub repo_name: GithubRepoName,
}

impl GithubRepositoryClient {
    pub fn client(&self) -> &Octocrab {
        &self.client
    }

    pub fn name(&self) -> &GithubRepoName {
        &self.repo_name
    }

    fn format_pr(&self, pr: PullRequestNumber) -> String {
        format!("{}#{}", self.name(), pr)
    }
}

#[async_trait]
impl RepositoryClient for GithubRepositoryClient {
    fn repository(&self) -> &GithubRepoName {
        self.name()
    }

    async fn load_config(&self) -> anyhow::Result<RepositoryConfig> {
        match load_config_file(self)
            .await
            .with_context(|| format!("Cannot load config of {}", self.name()))?
        {
            Some(content) => RepositoryConfig::parse(&content)
                .with_context(|| format!("Cannot parse config of {}", self.name())),
            None => {
                tracing::debug!("Repository {} has no config file", self.name());
                Ok(RepositoryConfig::default())
            }
        }
    }

    async fn get_labels(&self, pr: PullRequestNumber) -> anyhow::Result<Vec<Label>> {
        let page = self
            .client
            .issues(self.name().owner(), self.name().name())
            .list_labels_for_issue(pr.0)
            .per_page(100)
            .send()
            .await
            .with_context(|| format!("Cannot list labels of {}", self.format_pr(pr)))?;
        let labels = self
            .client
            .all_pages(page)
            .await
            .with_context(|| format!("Cannot list labels of {}", self.format_pr(pr)))?;
        Ok(labels
            .into_iter()
            .map(|label| Label { name: label.name })
            .collect())
    }

    async fn create_status(&self, verdict: &StatusVerdict) -> anyhow::Result<()> {
        create_commit_status(self, verdict).await.with_context(|| {
            format!(
                "Cannot set {} status on {}@{}",
                verdict.state,
                self.name(),
                verdict.target_sha
            )
        })
    }
}
