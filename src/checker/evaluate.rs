use crate::checker::event::PullRequestEvent;
use crate::checker::reference::{
    has_issue_reference, IssueReferenceMatcher, RepositoryUrlMatcher, ShorthandReferenceMatcher,
};
use crate::checker::verdict::{StatusState, StatusVerdict};
use crate::config::RepositoryConfig;
use crate::github::{AuthorType, Label};

pub const PENDING_DESCRIPTION: &str = "Checking if PR correctly references an issue";
pub const IGNORED_DESCRIPTION: &str = "PR does not need to reference an issue";
pub const REFERENCED_DESCRIPTION: &str = "PR references an issue";
pub const NOT_REFERENCED_DESCRIPTION: &str = "PR does not reference an issue";

/// Status reported as soon as a check starts.
pub fn pending_verdict(event: &PullRequestEvent) -> StatusVerdict {
    StatusVerdict::new(
        StatusState::Pending,
        PENDING_DESCRIPTION,
        event.head_sha.clone(),
    )
}

/// Decides whether the pull request satisfies the issue reference policy.
pub fn evaluate(
    event: &PullRequestEvent,
    config: &RepositoryConfig,
    labels: &[Label],
) -> StatusVerdict {
    evaluate_with(ShorthandReferenceMatcher::shared(), event, config, labels)
}

/// Same as [`evaluate`], but recognizes issue shorthands with the given `shorthand` matcher.
/// Links to issues of the event's own repository are always recognized.
pub fn evaluate_with(
    shorthand: &dyn IssueReferenceMatcher,
    event: &PullRequestEvent,
    config: &RepositoryConfig,
    labels: &[Label],
) -> StatusVerdict {
    let target_sha = event.head_sha.clone();

    if should_ignore(event, config, labels) {
        tracing::debug!("PR {} is exempt from referencing an issue", event.pr_number);
        return StatusVerdict::new(StatusState::Success, IGNORED_DESCRIPTION, target_sha);
    }

    let url = RepositoryUrlMatcher::new(&event.repository);
    if has_issue_reference(event.body.as_deref(), &[shorthand, &url]) {
        StatusVerdict::new(StatusState::Success, REFERENCED_DESCRIPTION, target_sha)
    } else {
        StatusVerdict::new(StatusState::Failure, NOT_REFERENCED_DESCRIPTION, target_sha)
    }
}

/// PRs with an ignored label and PRs opened by bots do not need to reference an issue.
/// Labels are lowercased before the comparison, ignore entries are taken verbatim.
fn should_ignore(event: &PullRequestEvent, config: &RepositoryConfig, labels: &[Label]) -> bool {
    let ignored = config.ignore_labels();
    let has_ignored_label = labels
        .iter()
        .any(|label| ignored.contains(label.name.to_lowercase().as_str()));
    let is_bot = event.author.kind == AuthorType::Bot;
    has_ignored_label || is_bot
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::GithubUser;
    use crate::tests::event::{pr_event, PullRequestEventBuilder};

    fn check(event: PullRequestEventBuilder, labels: &[&str]) -> StatusVerdict {
        let labels: Vec<Label> = labels.iter().map(|&l| l.into()).collect();
        evaluate(&event.create(), &RepositoryConfig::default(), &labels)
    }

    fn bot() -> GithubUser {
        GithubUser {
            username: "dependabot[bot]".to_string(),
            kind: AuthorType::Bot,
        }
    }

    #[test]
    fn references_issue_shorthand() {
        let verdict = check(pr_event().body(Some("Fixes #42".to_string())), &[]);
        assert_eq!(verdict.state, StatusState::Success);
        assert_eq!(verdict.description, REFERENCED_DESCRIPTION);
    }

    #[test]
    fn references_issue_shorthand_in_non_ascii_text() {
        let verdict = check(pr_event().body(Some("修复 #42号问题".to_string())), &[]);
        assert_eq!(verdict.state, StatusState::Success);
        assert_eq!(verdict.description, REFERENCED_DESCRIPTION);
    }

    #[test]
    fn ignored_label() {
        let verdict = check(
            pr_event().body(Some("No reference here".to_string())),
            &["docs"],
        );
        assert_eq!(verdict.state, StatusState::Success);
        assert_eq!(verdict.description, IGNORED_DESCRIPTION);
    }

    #[test]
    fn ignored_label_is_case_insensitive() {
        let verdict = check(pr_event().body(None), &["bug", "Release"]);
        assert_eq!(verdict.state, StatusState::Success);
        assert_eq!(verdict.description, IGNORED_DESCRIPTION);
    }

    #[test]
    fn ignored_label_is_not_trimmed() {
        let verdict = check(pr_event().body(None), &[" docs"]);
        assert_eq!(verdict.state, StatusState::Failure);
    }

    #[test]
    fn uppercase_ignore_entry_never_matches() {
        let config = RepositoryConfig {
            ignore: vec!["Docs".to_string()],
        };
        let verdict = evaluate(&pr_event().body(None).create(), &config, &["Docs".into()]);
        assert_eq!(verdict.state, StatusState::Failure);
    }

    #[test]
    fn custom_ignore_labels() {
        let config = RepositoryConfig {
            ignore: vec!["dependencies".to_string()],
        };
        let event = pr_event().body(None).create();
        assert_eq!(
            evaluate(&event, &config, &["Dependencies".into()]).state,
            StatusState::Success
        );
        assert_eq!(
            evaluate(&event, &config, &["docs".into()]).state,
            StatusState::Failure
        );
    }

    #[test]
    fn references_issue_url() {
        let verdict = check(
            pr_event()
                .repo("myorg/myrepo".parse().unwrap())
                .body(Some("See myorg/myrepo/issues/17 for context".to_string())),
            &[],
        );
        assert_eq!(verdict.state, StatusState::Success);
        assert_eq!(verdict.description, REFERENCED_DESCRIPTION);
    }

    #[test]
    fn issue_url_of_other_repository() {
        let verdict = check(
            pr_event()
                .repo("myorg/myrepo".parse().unwrap())
                .body(Some("See otherorg/other/issues/17".to_string())),
            &[],
        );
        assert_eq!(verdict.state, StatusState::Failure);
    }

    #[test]
    fn empty_body() {
        let verdict = check(pr_event().body(Some(String::new())), &[]);
        assert_eq!(verdict.state, StatusState::Failure);
        assert_eq!(verdict.description, NOT_REFERENCED_DESCRIPTION);
    }

    #[test]
    fn missing_body() {
        let verdict = check(pr_event().body(None), &[]);
        assert_eq!(verdict.state, StatusState::Failure);
    }

    #[test]
    fn bot_without_body() {
        let verdict = check(pr_event().body(None).author(bot()), &[]);
        assert_eq!(verdict.state, StatusState::Success);
        assert_eq!(verdict.description, IGNORED_DESCRIPTION);
    }

    #[test]
    fn bot_does_not_need_reference() {
        let verdict = check(
            pr_event()
                .body(Some("Bump serde".to_string()))
                .author(bot()),
            &["enhancement"],
        );
        assert_eq!(verdict.state, StatusState::Success);
    }

    #[test]
    fn other_account_types_need_reference() {
        let verdict = check(
            pr_event().body(None).author(GithubUser {
                username: "some-org".to_string(),
                kind: AuthorType::Other,
            }),
            &[],
        );
        assert_eq!(verdict.state, StatusState::Failure);
    }

    #[test]
    fn verdict_targets_head_commit() {
        let verdict = check(pr_event().head_sha("abcdef".to_string()), &[]);
        assert_eq!(verdict.target_sha.as_ref(), "abcdef");
        assert_eq!(verdict.context, "probot/pr-issue");
        assert!(verdict.is_terminal());
    }

    #[test]
    fn pending_verdict_targets_head_commit() {
        let verdict = pending_verdict(&pr_event().head_sha("abcdef".to_string()).create());
        assert_eq!(verdict.state, StatusState::Pending);
        assert_eq!(verdict.description, PENDING_DESCRIPTION);
        assert_eq!(verdict.target_sha.as_ref(), "abcdef");
        assert!(!verdict.is_terminal());
    }

    #[test]
    fn evaluate_is_idempotent() {
        let event = pr_event().body(Some("Fixes #1".to_string())).create();
        let config = RepositoryConfig::default();
        let labels: Vec<Label> = vec!["bug".into()];
        assert_eq!(
            evaluate(&event, &config, &labels),
            evaluate(&event, &config, &labels)
        );
    }

    #[test]
    fn custom_shorthand_matcher() {
        struct JiraMatcher;
        impl IssueReferenceMatcher for JiraMatcher {
            fn is_match(&self, text: &str) -> bool {
                text.contains("PROJ-")
            }
        }

        let config = RepositoryConfig::default();
        let event = pr_event().body(Some("Implements PROJ-12".to_string())).create();
        assert_eq!(
            evaluate_with(&JiraMatcher, &event, &config, &[]).state,
            StatusState::Success
        );
        // The shorthand rule is replaced, the repository URL rule is kept.
        let event = pr_event()
            .repo("owner/name".parse().unwrap())
            .body(Some("Fixes #1, see owner/name/issues/1".to_string()))
            .create();
        assert_eq!(
            evaluate_with(&JiraMatcher, &event, &config, &[]).state,
            StatusState::Success
        );
        let event = pr_event().body(Some("Fixes #1".to_string())).create();
        assert_eq!(
            evaluate_with(&JiraMatcher, &event, &config, &[]).state,
            StatusState::Failure
        );
    }
}
