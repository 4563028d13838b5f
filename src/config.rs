use std::collections::HashSet;

/// Location of the repository configuration file, relative to the repository root.
pub const CONFIG_FILE_PATH: &str = ".github/pr-issue.yml";

/// Labels that exempt a PR from referencing an issue when the repository does not configure any.
pub const DEFAULT_IGNORE_LABELS: &[&str] = &["release", "docs"];

/// Configuration of a repository loaded from a `.github/pr-issue.yml`
/// file. Keys missing from the file keep their default value.
#[derive(serde::Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct RepositoryConfig {
    /// Names of labels that exempt a PR from the issue reference requirement.
    /// Compared against lowercased label names.
    pub ignore: Vec<String>,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            ignore: DEFAULT_IGNORE_LABELS
                .iter()
                .map(|label| label.to_string())
                .collect(),
        }
    }
}

impl RepositoryConfig {
    /// Parses the content of a configuration file.
    /// An empty file is treated the same as a missing one.
    pub fn parse(content: &str) -> anyhow::Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn ignore_labels(&self) -> HashSet<&str> {
        self.ignore.iter().map(|label| label.as_str()).collect()
    }
}
