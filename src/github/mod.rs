//! Contains definitions of common types (repository name, commit SHA, labels, users) needed
//! for working with GitHub repositories.
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

pub mod api;
pub mod server;
mod webhook;

pub use api::GithubAppState;
pub use webhook::WebhookSecret;

/// Unique identifier of a GitHub repository.
///
/// The owner and name are kept exactly as GitHub sent them, because the name is also used to
/// recognize issue URLs written in pull request bodies.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct GithubRepoName {
    owner: String,
    name: String,
}

impl GithubRepoName {
    pub fn new(owner: &str, name: &str) -> Self {
        Self {
            owner: owner.to_string(),
            name: name.to_string(),
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Display for GithubRepoName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("{}/{}", self.owner, self.name))
    }
}

impl FromStr for GithubRepoName {
    type Err = anyhow::Error;

    /// Parses a full repository name in the `owner/name` format.
    fn from_str(full_name: &str) -> Result<Self, Self::Err> {
        match full_name.split_once('/') {
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
                Ok(Self::new(owner, name))
            }
            _ => Err(anyhow::anyhow!(
                "Repository name `{full_name}` is not in the `owner/name` format"
            )),
        }
    }
}

/// Type of the GitHub account that authored a pull request.
#[derive(serde::Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthorType {
    User,
    Bot,
    /// Organizations, mannequins and anything GitHub adds in the future.
    #[serde(other)]
    Other,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GithubUser {
    pub username: String,
    pub kind: AuthorType,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommitSha(pub String);

impl From<String> for CommitSha {
    fn from(value: String) -> Self {
        Self(value)
    }
}
impl AsRef<str> for CommitSha {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}
impl Display for CommitSha {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PullRequestNumber(pub u64);

impl From<u64> for PullRequestNumber {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl Display for PullRequestNumber {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        <u64 as Display>::fmt(&self.0, f)
    }
}

/// A label attached to a pull request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Label {
    pub name: String,
}

impl From<&str> for Label {
    fn from(value: &str) -> Self {
        Self {
            name: value.to_string(),
        }
    }
}
