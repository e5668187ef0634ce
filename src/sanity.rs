//! Pre-flight sanity checks for the runtime environment
//!
//! Run after the plan is known and before anything is installed:
//! - pacman (and sudo, unless already root) must be present for any install
//! - git and makepkg must be present if the AUR helper has to be bootstrapped
//! - the bootstrap cannot run as root, because makepkg refuses to
//!
//! In dry-run mode the driver only reports failures and carries on.

use crate::commands::Elevation;
use crate::reconcile::InstallPlan;
use crate::runner::CommandRunner;
use crate::types::AurHelper;

/// Result of environment verification
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SanityCheckResult {
    pub missing_binaries: Vec<String>,
    /// Running as root while the AUR helper needs building
    pub root_blocks_bootstrap: bool,
}

impl SanityCheckResult {
    /// Returns true if all checks passed
    pub fn is_ok(&self) -> bool {
        self.missing_binaries.is_empty() && !self.root_blocks_bootstrap
    }

    /// One human-readable problem per entry
    pub fn problems(&self) -> Vec<String> {
        let mut problems: Vec<String> = self
            .missing_binaries
            .iter()
            .map(|binary| {
                format!(
                    "missing required binary `{}` (install: pacman -S {})",
                    binary,
                    get_package_for_binary(binary)
                )
            })
            .collect();

        if self.root_blocks_bootstrap {
            problems.push(
                "the AUR helper must be built, but makepkg refuses to run as root; \
                 re-run as a regular user with sudo rights"
                    .to_string(),
            );
        }
        problems
    }
}

/// Check if running as root (EUID 0)
pub fn is_running_as_root() -> bool {
    nix::unistd::geteuid().is_root()
}

/// How root-only commands are elevated for this process
pub fn current_elevation() -> Elevation {
    if is_running_as_root() {
        Elevation::AlreadyRoot
    } else {
        Elevation::Sudo
    }
}

/// Binaries the plan will need, in the order they are first used
fn required_binaries(
    plan: &InstallPlan,
    helper_present: bool,
    elevation: Elevation,
) -> Vec<&'static str> {
    let mut required = Vec::new();
    if plan.is_empty() {
        return required;
    }

    if !plan.primary_targets.is_empty() && elevation == Elevation::Sudo {
        required.push("sudo");
    }
    required.push("pacman");

    if !plan.secondary_targets.is_empty() && !helper_present {
        required.extend(["git", "makepkg"]);
    }
    required
}

/// Perform all sanity checks and return the result
pub fn verify_environment(
    plan: &InstallPlan,
    helper: AurHelper,
    runner: &dyn CommandRunner,
    elevation: Elevation,
) -> SanityCheckResult {
    let helper_present =
        plan.secondary_targets.is_empty() || runner.is_available(helper.binary());

    let missing_binaries = required_binaries(plan, helper_present, elevation)
        .into_iter()
        .filter(|binary| !runner.is_available(binary))
        .map(str::to_string)
        .collect();

    let result = SanityCheckResult {
        missing_binaries,
        root_blocks_bootstrap: !helper_present && elevation == Elevation::AlreadyRoot,
    };

    tracing::debug!("Pre-flight result: {:?}", result);
    result
}

/// Map binary names to their Arch Linux package names
fn get_package_for_binary(binary: &str) -> &'static str {
    match binary {
        "pacman" | "makepkg" => "pacman",
        "sudo" => "sudo",
        "git" => "git",
        _ => "unknown", // Fallback for unknown binaries
    }
}
