//! Property-Based Tests for archpkgs
//!
//! Uses proptest for the list-handling invariants:
//! - Loader output is exactly the trimmed, comment-stripped, non-empty lines
//! - Reconciliation is idempotent
//! - AUR targets never overlap pacman targets
//! - Order is preserved and first occurrence wins

use proptest::prelude::*;
use std::collections::HashSet;

use archpkgs::{parse_package_list, reconcile_names, PackageName};

// =============================================================================
// Strategies
// =============================================================================

/// Package-ish names from a small alphabet so collisions are common
fn name_strategy() -> impl Strategy<Value = PackageName> {
    "[a-e][a-e0-9-]{0,3}".prop_map(|s| PackageName::new(s).expect("non-empty"))
}

fn names_strategy() -> impl Strategy<Value = Vec<PackageName>> {
    prop::collection::vec(name_strategy(), 0..12)
}

/// One line of a list file: a package, a comment, a blank, or a package with
/// a trailing comment, with random surrounding whitespace
fn line_strategy() -> impl Strategy<Value = String> {
    let ws = "[ \t]{0,3}";
    prop_oneof![
        (ws, "[a-z0-9][a-z0-9._+-]{0,8}", ws).prop_map(|(a, n, b)| format!("{}{}{}", a, n, b)),
        (ws, "[ a-z]{0,10}").prop_map(|(a, c)| format!("{}#{}", a, c)),
        ws.prop_map(|w| w.to_string()),
        ("[a-z0-9][a-z0-9-]{0,8}", "[ a-z#]{0,10}").prop_map(|(n, c)| format!("{} #{}", n, c)),
    ]
}

/// Reference model of the loader, written line by line
fn expected_names(lines: &[String]) -> Vec<String> {
    let mut out = Vec::new();
    for line in lines {
        let before_comment = line.split('#').next().unwrap_or("");
        let trimmed = before_comment.trim();
        if !trimmed.is_empty() {
            out.push(trimmed.to_string());
        }
    }
    out
}

// =============================================================================
// Loader Properties
// =============================================================================

proptest! {
    /// Loader keeps exactly the non-empty, trimmed, comment-stripped lines in order
    #[test]
    fn loader_matches_line_model(lines in prop::collection::vec(line_strategy(), 0..20)) {
        let content = lines.join("\n");
        let parsed: Vec<String> = parse_package_list(&content)
            .iter()
            .map(|p| p.as_str().to_string())
            .collect();
        prop_assert_eq!(parsed, expected_names(&lines));
    }

    /// Loader output never contains comments, blanks, or untrimmed names
    #[test]
    fn loader_output_is_clean(lines in prop::collection::vec(line_strategy(), 0..20)) {
        for name in parse_package_list(&lines.join("\n")) {
            let s = name.as_str();
            prop_assert!(!s.is_empty());
            prop_assert!(!s.contains('#'));
            prop_assert_eq!(s, s.trim());
        }
    }
}

// =============================================================================
// Reconciler Properties
// =============================================================================

proptest! {
    /// Reconciling a plan's own targets yields the same targets
    #[test]
    fn reconcile_is_idempotent(p in names_strategy(), s in names_strategy()) {
        let once = reconcile_names(&p, &s);
        let twice = reconcile_names(&once.primary_targets, &once.secondary_targets);
        prop_assert_eq!(&twice.primary_targets, &once.primary_targets);
        prop_assert_eq!(&twice.secondary_targets, &once.secondary_targets);
        prop_assert!(twice.overridden.is_empty());
    }

    /// No AUR target is also a pacman target
    #[test]
    fn reconcile_targets_are_disjoint(p in names_strategy(), s in names_strategy()) {
        let plan = reconcile_names(&p, &s);
        let primary: HashSet<&PackageName> = plan.primary_targets.iter().collect();
        for name in &plan.secondary_targets {
            prop_assert!(!primary.contains(name), "{} on both sides", name);
        }
    }

    /// Targets have no duplicates and cover every input name exactly once
    #[test]
    fn reconcile_covers_inputs_without_duplicates(p in names_strategy(), s in names_strategy()) {
        let plan = reconcile_names(&p, &s);

        let all: Vec<&PackageName> = plan
            .primary_targets
            .iter()
            .chain(&plan.secondary_targets)
            .collect();
        let unique: HashSet<&PackageName> = all.iter().copied().collect();
        prop_assert_eq!(all.len(), unique.len());

        let inputs: HashSet<&PackageName> = p.iter().chain(&s).collect();
        prop_assert_eq!(unique, inputs);
    }

    /// Targets keep first-occurrence order from their source list
    #[test]
    fn reconcile_preserves_first_seen_order(p in names_strategy(), s in names_strategy()) {
        let plan = reconcile_names(&p, &s);

        let mut seen = HashSet::new();
        let first_seen: Vec<&PackageName> = p.iter().filter(|n| seen.insert(*n)).collect();
        let primary: Vec<&PackageName> = plan.primary_targets.iter().collect();
        prop_assert_eq!(primary, first_seen);

        let positions: Vec<usize> = plan
            .secondary_targets
            .iter()
            .map(|n| s.iter().position(|x| x == n).expect("came from s"))
            .collect();
        prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }
}

// =============================================================================
// Fixed examples
// =============================================================================

#[test]
fn loader_example_from_docs() {
    let parsed = parse_package_list("git\n#comment\n\nvim");
    let names: Vec<&str> = parsed.iter().map(PackageName::as_str).collect();
    assert_eq!(names, vec!["git", "vim"]);
}

#[test]
fn reconcile_example_from_docs() {
    let p: Vec<PackageName> = ["git", "vim"].iter().filter_map(PackageName::new).collect();
    let s: Vec<PackageName> = ["vim", "spotify"].iter().filter_map(PackageName::new).collect();
    let plan = reconcile_names(&p, &s);

    let primary: Vec<&str> = plan.primary_targets.iter().map(PackageName::as_str).collect();
    let secondary: Vec<&str> = plan.secondary_targets.iter().map(PackageName::as_str).collect();
    assert_eq!(primary, vec!["git", "vim"]);
    assert_eq!(secondary, vec!["spotify"]);
}
