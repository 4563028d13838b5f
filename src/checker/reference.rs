use std::sync::LazyLock;

use regex::Regex;

use crate::github::GithubRepoName;

/// Recognizes issue references in the text of a pull request body.
pub trait IssueReferenceMatcher: Send + Sync {
    fn is_match(&self, text: &str) -> bool;
}

/// Matches the shorthand syntaxes GitHub links to issues:
/// `#123`, `GH-123` and `owner/repo#123`.
pub struct ShorthandReferenceMatcher {
    regex: Regex,
}

// Word boundaries are ASCII-only, so a number followed by non-ASCII text (`#42号`) still matches.
const SHORTHAND_PATTERN: &str = r"(?i)(?:(?-u:\b)[a-z0-9][a-z0-9-]{0,38}/[\w.-]{1,100})?#[1-9][0-9]*(?-u:\b)|(?-u:\b)GH-[1-9][0-9]*(?-u:\b)";

static SHARED_SHORTHAND_MATCHER: LazyLock<ShorthandReferenceMatcher> =
    LazyLock::new(ShorthandReferenceMatcher::new);

impl ShorthandReferenceMatcher {
    pub fn new() -> Self {
        Self {
            regex: Regex::new(SHORTHAND_PATTERN).expect("Invalid issue shorthand pattern"),
        }
    }

    /// Process-wide matcher, compiled on first use.
    pub fn shared() -> &'static Self {
        &SHARED_SHORTHAND_MATCHER
    }
}

impl Default for ShorthandReferenceMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl IssueReferenceMatcher for ShorthandReferenceMatcher {
    fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

/// Matches links to issues of a single repository, e.g. `owner/repo/issues/17`.
/// The repository name is matched literally and case-sensitively, anywhere in the text.
pub struct RepositoryUrlMatcher {
    regex: Regex,
}

impl RepositoryUrlMatcher {
    pub fn new(repository: &GithubRepoName) -> Self {
        let pattern = format!("{}/issues/[0-9]+", regex::escape(&repository.to_string()));
        Self {
            regex: Regex::new(&pattern).expect("Escaped repository pattern must be valid"),
        }
    }
}

impl IssueReferenceMatcher for RepositoryUrlMatcher {
    fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

/// Returns true if any of the `matchers` finds a reference in `body`.
/// A missing body never references anything.
pub fn has_issue_reference(body: Option<&str>, matchers: &[&dyn IssueReferenceMatcher]) -> bool {
    let Some(body) = body else {
        return false;
    };
    matchers.iter().any(|matcher| matcher.is_match(body))
}
