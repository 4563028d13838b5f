use base64::Engine;
use http::StatusCode;
use thiserror::Error;

use crate::checker::{RepositoryClient, StatusVerdict};
use crate::config::CONFIG_FILE_PATH;
use crate::github::api::client::GithubRepositoryClient;

#[derive(Error, Debug)]
pub enum ConfigLoadError {
    #[error("Unknown error ({status}): {text}")]
    Unknown { status: StatusCode, text: String },
    #[error("Network error: {0}")]
    NetworkError(#[from] octocrab::Error),
    #[error("Invalid file content: {0}")]
    InvalidContent(String),
}

#[derive(serde::Deserialize)]
struct ContentResponse {
    content: Option<String>,
    encoding: Option<String>,
}

/// Downloads the configuration file from the default branch of the repository.
/// Returns `None` if the file does not exist.
///
/// Documentation: https://docs.github.com/en/rest/repos/contents?apiVersion=2022-11-28#get-repository-content
pub async fn load_config_file(
    repo: &GithubRepositoryClient,
) -> Result<Option<String>, ConfigLoadError> {
    let client = repo.client();
    let url = format!("/repos/{}/contents/{CONFIG_FILE_PATH}", repo.repository());

    let response = client._get(url).await?;
    let status = response.status();
    let text = client.body_to_string(response).await.unwrap_or_default();

    tracing::trace!(
        "Response from loading `{CONFIG_FILE_PATH}` from `{}`: {status}",
        repo.repository(),
    );

    match status {
        StatusCode::OK => {
            let response: ContentResponse = serde_json::from_str(&text)
                .map_err(|error| ConfigLoadError::InvalidContent(format!("{error:?}")))?;
            decode_content(response).map(Some)
        }
        StatusCode::NOT_FOUND => Ok(None),
        _ => Err(ConfigLoadError::Unknown { status, text }),
    }
}

fn decode_content(response: ContentResponse) -> Result<String, ConfigLoadError> {
    let Some(content) = response.content else {
        return Err(ConfigLoadError::InvalidContent(format!(
            "`{CONFIG_FILE_PATH}` is not a file"
        )));
    };
    match response.encoding.as_deref() {
        Some("base64") => {
            // GitHub wraps the encoded content into lines
            let content: String = content.split_whitespace().collect();
            let bytes = base64::prelude::BASE64_STANDARD
                .decode(content)
                .map_err(|error| ConfigLoadError::InvalidContent(format!("{error:?}")))?;
            String::from_utf8(bytes)
                .map_err(|error| ConfigLoadError::InvalidContent(format!("{error:?}")))
        }
        Some(encoding) => Err(ConfigLoadError::InvalidContent(format!(
            "Unsupported encoding {encoding}"
        ))),
        None => Ok(content),
    }
}

#[derive(serde::Serialize)]
struct CreateStatusRequest<'a> {
    state: String,
    description: &'a str,
    context: &'a str,
}

/// Creates a commit status on the commit targeted by the verdict.
///
/// Documentation: https://docs.github.com/en/rest/commits/statuses?apiVersion=2022-11-28#create-a-commit-status
pub async fn create_commit_status(
    repo: &GithubRepositoryClient,
    verdict: &StatusVerdict,
) -> anyhow::Result<()> {
    let url = format!("/repos/{}/statuses/{}", repo.repository(), verdict.target_sha);
    let request = CreateStatusRequest {
        state: verdict.state.to_string(),
        description: &verdict.description,
        context: verdict.context,
    };
    let _: serde_json::Value = repo.client().post(url, Some(&request)).await?;
    Ok(())
}
