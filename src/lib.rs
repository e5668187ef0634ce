//! archpkgs Library
//!
//! Loads pacman and AUR package lists, reconciles them into one install plan,
//! and drives pacman and the AUR helper to install it.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod installer;
pub mod log_sink;
pub mod package_list;
pub mod prompt;
pub mod reconcile;
pub mod runner;
pub mod sanity;
pub mod types;

// Re-export main types for convenience
pub use commands::{CommandArgs, Elevation, Invocation};
pub use config::{ConfigFile, ConfigOverrides, Settings};
pub use error::InstallError;
pub use installer::{InstallStage, Installer, InstallerOptions, RunOutcome, StageOutcome};
pub use log_sink::LogSink;
pub use package_list::{load_package_list, parse_package_list, PackageList};
pub use prompt::{LinePrompter, Prompter};
pub use reconcile::{reconcile, reconcile_names, InstallPlan};
pub use runner::{CommandOutput, CommandRunner, SystemRunner};
pub use types::{AurHelper, ExecutionMode, PackageName, PackageSource};
