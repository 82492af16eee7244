use super::*;

fn safe_rule(pattern: &str) -> BranchProtectionRule {
    BranchProtectionRule {
        pattern: pattern.to_string(),
        required_approving_review_count: Some(1),
        requires_status_checks: true,
        requires_strict_status_checks: true,
        requires_approving_reviews: true,
        required_status_checks: vec!["build".to_string()],
    }
}

#[test]
fn test_fully_strict_rule_is_safe() {
    let rules = vec![safe_rule("main")];

    assert!(auto_merge_is_safe(&rules, "main"));
}

#[test]
fn test_no_rules_is_unsafe() {
    assert!(!auto_merge_is_safe(&[], "main"));
}

#[test]
fn test_no_matching_pattern_is_unsafe() {
    let rules = vec![safe_rule("release/*")];

    assert!(!auto_merge_is_safe(&rules, "main"));
}

#[test]
fn test_pattern_match_is_exact_not_glob() {
    // A glob pattern that would cover the default branch does not count;
    // only a literal name match does.
    let rules = vec![safe_rule("ma*")];

    assert!(!auto_merge_is_safe(&rules, "main"));
}

#[test]
fn test_missing_review_count_is_unsafe() {
    let mut rule = safe_rule("main");
    rule.required_approving_review_count = None;

    assert!(!auto_merge_is_safe(&[rule], "main"));
}

#[test]
fn test_zero_review_count_is_unsafe() {
    let mut rule = safe_rule("main");
    rule.required_approving_review_count = Some(0);

    assert!(!auto_merge_is_safe(&[rule], "main"));
}

#[test]
fn test_status_checks_not_required_is_unsafe() {
    let mut rule = safe_rule("main");
    rule.requires_status_checks = false;

    assert!(!auto_merge_is_safe(&[rule], "main"));
}

#[test]
fn test_non_strict_status_checks_is_unsafe() {
    let mut rule = safe_rule("main");
    rule.requires_strict_status_checks = false;

    assert!(!auto_merge_is_safe(&[rule], "main"));
}

#[test]
fn test_reviews_not_required_is_unsafe() {
    let mut rule = safe_rule("main");
    rule.requires_approving_reviews = false;

    assert!(!auto_merge_is_safe(&[rule], "main"));
}

#[test]
fn test_empty_required_contexts_is_unsafe() {
    let mut rule = safe_rule("main");
    rule.required_status_checks = vec![];

    assert!(!auto_merge_is_safe(&[rule], "main"));
}

#[test]
fn test_first_matching_rule_is_authoritative() {
    let mut weak = safe_rule("main");
    weak.requires_status_checks = false;

    // The first rule for the branch decides; the later, stricter duplicate
    // is ignored.
    let rules = vec![weak, safe_rule("main")];
    assert!(!auto_merge_is_safe(&rules, "main"));

    let rules = vec![safe_rule("main"), {
        let mut weak = safe_rule("main");
        weak.requires_approving_reviews = false;
        weak
    }];
    assert!(auto_merge_is_safe(&rules, "main"));
}

#[test]
fn test_non_matching_rules_are_skipped_before_match() {
    let mut other_branch = safe_rule("develop");
    other_branch.requires_status_checks = false;

    let rules = vec![other_branch, safe_rule("main")];

    assert!(auto_merge_is_safe(&rules, "main"));
}
