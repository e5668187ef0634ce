//! Core types for archpkgs
//!
//! Package names, list sources, the execution mode, and the supported AUR
//! helpers. Enums derive strum `Display` for log lines; `AurHelper` also
//! parses from CLI flags and the JSON config file.

use serde::Deserialize;
use std::fmt;
use strum::{Display, EnumString};

/// A single package name as it appears in a list file.
///
/// Always non-empty, trimmed, and free of newlines. No other syntax checks are
/// made; whatever the package manager accepts is accepted here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PackageName(String);

impl PackageName {
    /// Trim `raw` and wrap it, or return `None` if nothing usable is left.
    pub fn new(raw: impl AsRef<str>) -> Option<Self> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() || trimmed.contains(['\n', '\r']) {
            return None;
        }
        Some(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PackageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PackageName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Which manager owns a package list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum PackageSource {
    /// Official repositories, installed with pacman
    #[strum(serialize = "pacman")]
    Primary,
    /// AUR packages, installed with the AUR helper
    #[strum(serialize = "aur")]
    Secondary,
}

/// How confirmations and commands are handled for the whole run.
///
/// Chosen once from CLI flags and never changed afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum ExecutionMode {
    /// Ask before acting
    #[default]
    Interactive,
    /// Answer yes to every prompt and pass `--noconfirm` through
    AssumeYes,
    /// Print commands instead of running them
    DryRun,
}

impl ExecutionMode {
    /// Resolve the mode from the two CLI switches. Dry-run wins over `--yes`.
    pub fn from_flags(assume_yes: bool, dry_run: bool) -> Self {
        if dry_run {
            Self::DryRun
        } else if assume_yes {
            Self::AssumeYes
        } else {
            Self::Interactive
        }
    }

    /// Whether prompts are answered without asking
    pub fn auto_confirms(&self) -> bool {
        !matches!(self, Self::Interactive)
    }

    pub fn is_dry_run(&self) -> bool {
        matches!(self, Self::DryRun)
    }
}

/// AUR helper selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[derive(Display, EnumString)]
#[serde(rename_all = "lowercase")]
pub enum AurHelper {
    #[default]
    #[strum(serialize = "paru")]
    Paru,
    #[strum(serialize = "yay")]
    Yay,
}

impl AurHelper {
    /// Binary name looked up on the search path
    pub fn binary(&self) -> &'static str {
        match self {
            Self::Paru => "paru",
            Self::Yay => "yay",
        }
    }

    /// Git URL of the helper's AUR build recipe
    pub fn aur_url(&self) -> String {
        format!("https://aur.archlinux.org/{}.git", self.binary())
    }
}
