//! Package list reconciliation
//!
//! Merges the pacman list and the AUR list into an [`InstallPlan`].
//!
//! # Rules
//!
//! - Duplicates inside a list are dropped; the first occurrence keeps its place.
//! - A name on both lists is installed by pacman only. The AUR helper never
//!   installs over something the official repositories own.
//!
//! Pure logic: no I/O, no logging.

use crate::package_list::PackageList;
use crate::types::PackageName;
use std::collections::HashSet;

/// The reconciled set of packages to install, split by owning manager.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallPlan {
    /// Installed with pacman
    pub primary_targets: Vec<PackageName>,
    /// Installed with the AUR helper; never overlaps `primary_targets`
    pub secondary_targets: Vec<PackageName>,
    /// AUR-list entries dropped because the pacman list already has them
    pub overridden: Vec<PackageName>,
}

impl InstallPlan {
    /// True when neither manager has anything to install
    pub fn is_empty(&self) -> bool {
        self.primary_targets.is_empty() && self.secondary_targets.is_empty()
    }

    /// Total packages across both managers
    pub fn len(&self) -> usize {
        self.primary_targets.len() + self.secondary_targets.len()
    }
}

/// Build the install plan from the two lists.
pub fn reconcile(primary: &PackageList, secondary: &PackageList) -> InstallPlan {
    reconcile_names(&primary.packages, &secondary.packages)
}

/// Same as [`reconcile`], on bare name slices.
pub fn reconcile_names(primary: &[PackageName], secondary: &[PackageName]) -> InstallPlan {
    let primary_targets = dedup_preserving_order(primary);
    let owned: HashSet<&PackageName> = primary_targets.iter().collect();

    let mut secondary_targets = Vec::new();
    let mut overridden = Vec::new();
    for name in dedup_preserving_order(secondary) {
        if owned.contains(&name) {
            overridden.push(name);
        } else {
            secondary_targets.push(name);
        }
    }

    InstallPlan {
        primary_targets,
        secondary_targets,
        overridden,
    }
}

/// Drop repeated names, keeping the first occurrence in place.
fn dedup_preserving_order(names: &[PackageName]) -> Vec<PackageName> {
    let mut seen = HashSet::with_capacity(names.len());
    names
        .iter()
        .filter(|name| seen.insert(*name))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pkgs(names: &[&str]) -> Vec<PackageName> {
        names.iter().filter_map(PackageName::new).collect()
    }

    fn strs(names: &[PackageName]) -> Vec<&str> {
        names.iter().map(PackageName::as_str).collect()
    }

    #[test]
    fn test_primary_wins_on_collision() {
        let plan = reconcile_names(&pkgs(&["git", "vim"]), &pkgs(&["vim", "spotify"]));
        assert_eq!(strs(&plan.primary_targets), vec!["git", "vim"]);
        assert_eq!(strs(&plan.secondary_targets), vec!["spotify"]);
        assert_eq!(strs(&plan.overridden), vec!["vim"]);
    }

    #[test]
    fn test_in_list_duplicates_first_wins() {
        let plan = reconcile_names(
            &pkgs(&["zsh", "git", "zsh", "curl", "git"]),
            &pkgs(&["yay-bin", "spotify", "yay-bin"]),
        );
        assert_eq!(strs(&plan.primary_targets), vec!["zsh", "git", "curl"]);
        assert_eq!(strs(&plan.secondary_targets), vec!["yay-bin", "spotify"]);
        assert!(plan.overridden.is_empty());
    }

    #[test]
    fn test_overridden_reported_once() {
        let plan = reconcile_names(&pkgs(&["vim"]), &pkgs(&["vim", "vim"]));
        assert!(plan.secondary_targets.is_empty());
        assert_eq!(strs(&plan.overridden), vec!["vim"]);
    }

    #[test]
    fn test_both_empty_is_empty_plan() {
        let plan = reconcile_names(&[], &[]);
        assert!(plan.is_empty());
        assert_eq!(plan.len(), 0);
        assert_eq!(plan, InstallPlan::default());
    }

    #[test]
    fn test_only_secondary() {
        let plan = reconcile_names(&[], &pkgs(&["visual-studio-code-bin"]));
        assert!(plan.primary_targets.is_empty());
        assert_eq!(strs(&plan.secondary_targets), vec!["visual-studio-code-bin"]);
        assert!(!plan.is_empty());
    }

    #[test]
    fn test_exact_match_only() {
        let plan = reconcile_names(&pkgs(&["Vim"]), &pkgs(&["vim"]));
        assert_eq!(strs(&plan.secondary_targets), vec!["vim"]);
    }
}
