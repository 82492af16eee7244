use super::*;
use chrono::TimeZone;

fn suite(conclusion: Option<CheckConclusion>) -> CheckSuite {
    CheckSuite {
        id: "CS_abc123".to_string(),
        conclusion,
        workflow_run: Some(WorkflowRun {
            database_id: 42,
            workflow_name: "ci".to_string(),
        }),
    }
}

#[test]
fn test_check_conclusion_deserializes_screaming_snake_case() {
    let conclusion: CheckConclusion = serde_json::from_str("\"SUCCESS\"").unwrap();
    assert_eq!(conclusion, CheckConclusion::Success);

    let conclusion: CheckConclusion = serde_json::from_str("\"TIMED_OUT\"").unwrap();
    assert_eq!(conclusion, CheckConclusion::TimedOut);

    let conclusion: CheckConclusion = serde_json::from_str("\"ACTION_REQUIRED\"").unwrap();
    assert_eq!(conclusion, CheckConclusion::ActionRequired);
}

#[test]
fn test_check_conclusion_rejects_unknown_values() {
    // The enum is closed: a value outside the documented set is a
    // deserialization failure, not a silent default.
    let result = serde_json::from_str::<CheckConclusion>("\"STARTUP_FAILURE\"");
    assert!(result.is_err());
}

#[test]
fn test_auto_merge_enabled_reflects_timestamp_presence() {
    let enabled_at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();

    let mut pull_request = PullRequest {
        id: "PR_node1".to_string(),
        number: 7,
        title: "Bump dependency".to_string(),
        url: "https://github.com/acme/widget/pull/7".to_string(),
        author_login: "dependabot".to_string(),
        auto_merge_enabled_at: Some(enabled_at),
        check_suites: vec![suite(Some(CheckConclusion::Success))],
    };
    assert!(pull_request.auto_merge_enabled());

    pull_request.auto_merge_enabled_at = None;
    assert!(!pull_request.auto_merge_enabled());
}

#[test]
fn test_check_suite_without_workflow_run() {
    // Suites from external check apps carry no workflow run.
    let suite = CheckSuite {
        id: "CS_external".to_string(),
        conclusion: Some(CheckConclusion::Failure),
        workflow_run: None,
    };

    assert!(suite.workflow_run.is_none());
}

#[test]
fn test_models_round_trip_through_serde() {
    let snapshot = RepositorySnapshot {
        pull_requests: vec![PullRequest {
            id: "PR_node1".to_string(),
            number: 12,
            title: "Fix flaky test".to_string(),
            url: "https://github.com/acme/widget/pull/12".to_string(),
            author_login: String::new(),
            auto_merge_enabled_at: None,
            check_suites: vec![suite(None)],
        }],
        branch_protection_rules: vec![BranchProtectionRule {
            pattern: "main".to_string(),
            required_approving_review_count: Some(1),
            requires_status_checks: true,
            requires_strict_status_checks: true,
            requires_approving_reviews: true,
            required_status_checks: vec!["build".to_string()],
        }],
    };

    let serialized = serde_json::to_string(&snapshot).unwrap();
    let deserialized: RepositorySnapshot = serde_json::from_str(&serialized).unwrap();

    assert_eq!(deserialized.pull_requests.len(), 1);
    assert_eq!(deserialized.pull_requests[0].number, 12);
    assert!(deserialized.pull_requests[0].check_suites[0].conclusion.is_none());
    assert_eq!(deserialized.branch_protection_rules[0].pattern, "main");
}
