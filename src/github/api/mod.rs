use anyhow::Context;
use axum::async_trait;
use octocrab::models::AppId;
use octocrab::Octocrab;
use secrecy::{ExposeSecret, SecretVec};

use client::GithubRepositoryClient;

use crate::checker::event::PullRequestEvent;
use crate::checker::RepositoryClientLoader;

pub mod client;
pub(crate) mod operations;

/// Provides access to repositories where the GitHub App is installed.
pub struct GithubAppState {
    client: Octocrab,
}

impl GithubAppState {
    /// Authenticates as the GitHub App with the given ID.
    pub async fn load(app_id: AppId, private_key: SecretVec<u8>) -> anyhow::Result<GithubAppState> {
        let key = jsonwebtoken::EncodingKey::from_rsa_pem(private_key.expose_secret().as_ref())
            .context("Could not encode private key")?;

        let client = Octocrab::builder()
            .app(app_id, key)
            .build()
            .context("Could not create octocrab builder")?;

        let app = client
            .current()
            .app()
            .await
            .context("Could not load Github App")?;
        tracing::info!("Loaded Github App {} ({})", app.name, app.id);

        Ok(GithubAppState { client })
    }
}

#[async_trait]
impl RepositoryClientLoader for GithubAppState {
    type Client = GithubRepositoryClient;

    /// Creates a client authenticated as the installation that sent the event.
    async fn client_for(&self, event: &PullRequestEvent) -> anyhow::Result<GithubRepositoryClient> {
        let Some(installation) = event.installation else {
            return Err(anyhow::anyhow!(
                "Event for {} does not belong to any installation",
                event.repository
            ));
        };
        Ok(GithubRepositoryClient {
            client: self.client.installation(installation),
            repo_name: event.repository.clone(),
        })
    }
}
