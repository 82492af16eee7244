use super::*;

fn names(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

#[test]
fn test_selects_by_literal_prefix_preserving_order() {
    let candidates = names(&[
        "terraform-aws-foo",
        "something-else",
        "foo",
        "terraform-blah",
    ]);
    let prefixes = names(&["terraform-", "foo"]);

    let selected = select_repositories(&candidates, &prefixes);

    assert_eq!(
        selected,
        names(&["terraform-aws-foo", "foo", "terraform-blah"])
    );
}

#[test]
fn test_empty_prefix_list_selects_nothing() {
    let candidates = names(&["terraform-aws-foo", "foo"]);

    let selected = select_repositories(&candidates, &[]);

    assert!(selected.is_empty());
}

#[test]
fn test_empty_candidate_list_selects_nothing() {
    let prefixes = names(&["terraform-"]);

    let selected = select_repositories(&[], &prefixes);

    assert!(selected.is_empty());
}

#[test]
fn test_repository_matching_several_prefixes_is_emitted_once() {
    let candidates = names(&["terraform-aws-foo"]);
    let prefixes = names(&["terraform-", "terraform-aws-"]);

    let selected = select_repositories(&candidates, &prefixes);

    assert_eq!(selected, names(&["terraform-aws-foo"]));
}

#[test]
fn test_matching_is_case_sensitive() {
    let candidates = names(&["Terraform-aws-foo"]);
    let prefixes = names(&["terraform-"]);

    let selected = select_repositories(&candidates, &prefixes);

    assert!(selected.is_empty());
}

#[test]
fn test_prefix_equal_to_name_matches() {
    let candidates = names(&["foo"]);
    let prefixes = names(&["foo"]);

    let selected = select_repositories(&candidates, &prefixes);

    assert_eq!(selected, names(&["foo"]));
}
