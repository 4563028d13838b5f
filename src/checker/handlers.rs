use anyhow::Context;
use tracing::Instrument;

use crate::checker::event::{PrIssueEvent, PullRequestEvent};
use crate::checker::{evaluate, pending_verdict, RepositoryClient, RepositoryClientLoader};

/// This function executes a single event.
pub async fn handle_pr_issue_event<Loader: RepositoryClientLoader>(
    event: PrIssueEvent,
    loader: &Loader,
) -> anyhow::Result<()> {
    match event {
        PrIssueEvent::PullRequest(payload) => {
            let span = tracing::info_span!(
                "Pull request",
                pr = format!("{}#{}", payload.repository, payload.pr_number),
                action = ?payload.action,
            );
            async {
                let client = loader.client_for(&payload).await.with_context(|| {
                    format!("Cannot create client for {}", payload.repository)
                })?;
                handle_pull_request_event(&client, &payload).await
            }
            .instrument(span)
            .await?;
        }
    }
    Ok(())
}

/// Reports a pending status, decides whether the PR references an issue and reports the result.
/// Any failed GitHub call aborts the check.
pub(super) async fn handle_pull_request_event<Client: RepositoryClient>(
    client: &Client,
    event: &PullRequestEvent,
) -> anyhow::Result<()> {
    client
        .create_status(&pending_verdict(event))
        .await
        .context("Cannot report pending status")?;

    let config = client
        .load_config()
        .await
        .context("Cannot load repository config")?;
    let labels = client
        .get_labels(event.pr_number)
        .await
        .context("Cannot load PR labels")?;
    tracing::trace!("Config: {config:?}, labels: {labels:?}");

    let verdict = evaluate(event, &config, &labels);
    tracing::info!(
        "PR {} check finished with {}: {}",
        event.pr_number,
        verdict.state,
        verdict.description
    );
    client
        .create_status(&verdict)
        .await
        .context("Cannot report check result")?;
    Ok(())
}
