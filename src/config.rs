//! Run configuration.
//!
//! Settings come from three layers, highest priority first:
//!
//! 1. CLI flags ([`ConfigOverrides`])
//! 2. An optional JSON file (`archpkgs.json` in the base directory, or the
//!    file given with `--config`)
//! 3. Built-in defaults
//!
//! Relative paths from any layer resolve against the base directory.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::types::AurHelper;

/// Default pacman list file name
pub const DEFAULT_PACMAN_LIST: &str = "pacman.txt";
/// Default AUR list file name
pub const DEFAULT_AUR_LIST: &str = "aur.txt";
/// Default install log file name
pub const DEFAULT_LOG_FILE: &str = "install.log";
/// Config file picked up from the base directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "archpkgs.json";

/// On-disk configuration. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub pacman_list: Option<PathBuf>,
    pub aur_list: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
    pub aur_helper: Option<AurHelper>,
    pub build_root: Option<PathBuf>,
}

impl ConfigFile {
    /// Load configuration from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read configuration from {:?}", path.as_ref()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse configuration JSON in {:?}", path.as_ref()))?;

        Ok(config)
    }
}

/// Values given on the command line. `None` means "not given".
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub base_dir: Option<PathBuf>,
    pub config_file: Option<PathBuf>,
    pub pacman_list: Option<PathBuf>,
    pub aur_list: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
    pub aur_helper: Option<AurHelper>,
}

/// Fully resolved settings for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub base_dir: PathBuf,
    pub pacman_list: PathBuf,
    pub aur_list: PathBuf,
    pub log_file: PathBuf,
    pub aur_helper: AurHelper,
    /// Parent of the throwaway directory the AUR helper is built in
    pub build_root: PathBuf,
}

impl Settings {
    /// Merge CLI overrides, the config file, and defaults.
    ///
    /// An explicit `--config` must exist; the implicit `archpkgs.json` is
    /// only read when present.
    pub fn resolve(overrides: &ConfigOverrides) -> Result<Self> {
        let base_dir = overrides
            .base_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."));

        let file = match &overrides.config_file {
            Some(path) => ConfigFile::load_from_file(base_dir.join(path))?,
            None => {
                let implicit = base_dir.join(DEFAULT_CONFIG_FILE);
                if implicit.is_file() {
                    tracing::debug!("Using config file {}", implicit.display());
                    ConfigFile::load_from_file(&implicit)?
                } else {
                    ConfigFile::default()
                }
            }
        };

        let pick = |cli: &Option<PathBuf>, from_file: &Option<PathBuf>, default: &str| {
            let chosen = cli
                .clone()
                .or_else(|| from_file.clone())
                .unwrap_or_else(|| PathBuf::from(default));
            base_dir.join(chosen)
        };

        let pacman_list = pick(&overrides.pacman_list, &file.pacman_list, DEFAULT_PACMAN_LIST);
        let aur_list = pick(&overrides.aur_list, &file.aur_list, DEFAULT_AUR_LIST);
        let log_file = pick(&overrides.log_file, &file.log_file, DEFAULT_LOG_FILE);

        let aur_helper = overrides
            .aur_helper
            .or(file.aur_helper)
            .unwrap_or_default();

        let build_root = match &file.build_root {
            Some(dir) => base_dir.join(dir),
            None => std::env::temp_dir(),
        };

        Ok(Self {
            base_dir,
            pacman_list,
            aur_list,
            log_file,
            aur_helper,
            build_root,
        })
    }
}
