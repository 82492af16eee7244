use super::*;
use chrono::{TimeZone, Utc};

fn actors(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

fn pull_request(author: &str, auto_merge_enabled: bool) -> PullRequest {
    PullRequest {
        id: "PR_node1".to_string(),
        number: 42,
        title: "Bump serde".to_string(),
        url: "https://github.com/acme/widget/pull/42".to_string(),
        author_login: author.to_string(),
        auto_merge_enabled_at: auto_merge_enabled
            .then(|| Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()),
        check_suites: vec![],
    }
}

#[test]
fn test_allow_listed_author_on_safe_branch_enables() {
    let decision = evaluate_auto_merge(
        &pull_request("dependabot[bot]", false),
        true,
        &actors(&["dependabot[bot]", "renovate[bot]"]),
    );

    assert_eq!(decision, AutoMergeDecision::Enable);
}

#[test]
fn test_unknown_author_is_skipped() {
    let decision = evaluate_auto_merge(
        &pull_request("octocat", false),
        true,
        &actors(&["dependabot[bot]"]),
    );

    assert_eq!(decision, AutoMergeDecision::SkipAuthor);
}

#[test]
fn test_empty_actor_list_skips_everyone() {
    let decision = evaluate_auto_merge(&pull_request("dependabot[bot]", false), true, &[]);

    assert_eq!(decision, AutoMergeDecision::SkipAuthor);
}

#[test]
fn test_deleted_author_is_skipped() {
    // A deleted account surfaces as an empty login, which can never be in
    // the allow-list.
    let decision = evaluate_auto_merge(
        &pull_request("", false),
        true,
        &actors(&["dependabot[bot]"]),
    );

    assert_eq!(decision, AutoMergeDecision::SkipAuthor);
}

#[test]
fn test_already_enabled_is_never_re_enabled() {
    let decision = evaluate_auto_merge(
        &pull_request("dependabot[bot]", true),
        true,
        &actors(&["dependabot[bot]"]),
    );

    assert_eq!(decision, AutoMergeDecision::AlreadyEnabled);
}

#[test]
fn test_unsafe_branch_blocks_enablement() {
    let decision = evaluate_auto_merge(
        &pull_request("dependabot[bot]", false),
        false,
        &actors(&["dependabot[bot]"]),
    );

    assert_eq!(decision, AutoMergeDecision::BranchUnsafe);
}

#[test]
fn test_author_check_wins_over_already_enabled() {
    // An unlisted author is reported as SkipAuthor even when auto-merge is
    // already on; the decision order is stable.
    let decision = evaluate_auto_merge(
        &pull_request("octocat", true),
        false,
        &actors(&["dependabot[bot]"]),
    );

    assert_eq!(decision, AutoMergeDecision::SkipAuthor);
}
