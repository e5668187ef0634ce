//! Type-safe command argument contracts.
//!
//! Every external program archpkgs runs is described by a struct implementing
//! [`CommandArgs`]. The struct produces an explicit argument vector, so
//! package names are handed to the program as separate argv entries and are
//! never interpreted by a shell.
//!
//! | Struct               | Command |
//! |----------------------|---------|
//! | `SystemUpgradeArgs`  | `pacman -Syu` |
//! | `PacmanInstallArgs`  | `pacman -S --needed <pkgs>` |
//! | `GitCloneArgs`       | `git clone <url> <dir>` |
//! | `MakepkgArgs`        | `makepkg -si` (in the recipe directory) |
//! | `HelperInstallArgs`  | `<helper> -S --needed <pkgs>` |

use crate::types::{AurHelper, PackageName};
use std::fmt;
use std::path::{Path, PathBuf};

/// Whether root-only commands need a `sudo` prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Elevation {
    /// Not root: prefix root-only commands with `sudo`
    Sudo,
    /// Already root: run everything as-is
    AlreadyRoot,
}

/// A fully resolved program invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub working_dir: Option<PathBuf>,
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(dir) = &self.working_dir {
            write!(f, "(cd {}) ", dir.display())?;
        }
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Trait for typed command arguments.
///
/// # Contract
///
/// - `program()`: the binary to run, looked up on the search path.
/// - `to_cli_args()`: arguments exactly as the program expects them.
/// - `needs_root()`: whether the program must run as root.
/// - `working_dir()`: directory to run in, if not the current one.
pub trait CommandArgs {
    fn program(&self) -> &'static str;

    fn to_cli_args(&self) -> Vec<String>;

    fn needs_root(&self) -> bool {
        false
    }

    fn working_dir(&self) -> Option<&Path> {
        None
    }

    /// Resolve into an [`Invocation`], adding `sudo` when required.
    fn invocation(&self, elevation: Elevation) -> Invocation {
        let (program, args) = if self.needs_root() && elevation == Elevation::Sudo {
            let mut args = vec![self.program().to_string()];
            args.extend(self.to_cli_args());
            ("sudo".to_string(), args)
        } else {
            (self.program().to_string(), self.to_cli_args())
        };

        Invocation {
            program,
            args,
            working_dir: self.working_dir().map(Path::to_path_buf),
        }
    }
}

fn push_noconfirm(args: &mut Vec<String>, noconfirm: bool) {
    if noconfirm {
        args.push("--noconfirm".to_string());
    }
}

fn push_packages(args: &mut Vec<String>, packages: &[PackageName]) {
    args.extend(packages.iter().map(|p| p.as_str().to_string()));
}

// ============================================================================
// pacman
// ============================================================================

/// Full system sync and upgrade, run before any pacman install so new
/// packages are never built against a partially upgraded system.
#[derive(Debug, Clone)]
pub struct SystemUpgradeArgs {
    pub noconfirm: bool,
}

impl CommandArgs for SystemUpgradeArgs {
    fn program(&self) -> &'static str {
        "pacman"
    }

    fn to_cli_args(&self) -> Vec<String> {
        let mut args = vec!["-Syu".to_string()];
        push_noconfirm(&mut args, self.noconfirm);
        args
    }

    fn needs_root(&self) -> bool {
        true
    }
}

/// Batch install from the official repositories. `--needed` makes already
/// installed packages a no-op.
#[derive(Debug, Clone)]
pub struct PacmanInstallArgs {
    pub packages: Vec<PackageName>,
    pub noconfirm: bool,
}

impl CommandArgs for PacmanInstallArgs {
    fn program(&self) -> &'static str {
        "pacman"
    }

    fn to_cli_args(&self) -> Vec<String> {
        let mut args = vec!["-S".to_string(), "--needed".to_string()];
        push_noconfirm(&mut args, self.noconfirm);
        push_packages(&mut args, &self.packages);
        args
    }

    fn needs_root(&self) -> bool {
        true
    }
}

// ============================================================================
// AUR helper bootstrap
// ============================================================================

/// Clone an AUR build recipe.
#[derive(Debug, Clone)]
pub struct GitCloneArgs {
    pub url: String,
    pub destination: PathBuf,
}

impl CommandArgs for GitCloneArgs {
    fn program(&self) -> &'static str {
        "git"
    }

    fn to_cli_args(&self) -> Vec<String> {
        vec![
            "clone".to_string(),
            self.url.clone(),
            self.destination.display().to_string(),
        ]
    }
}

/// Build and install the recipe in `build_dir`.
///
/// `makepkg` refuses to run as root; it calls sudo itself for the install
/// step, so this never gets a `sudo` prefix.
#[derive(Debug, Clone)]
pub struct MakepkgArgs {
    pub build_dir: PathBuf,
    pub noconfirm: bool,
}

impl CommandArgs for MakepkgArgs {
    fn program(&self) -> &'static str {
        "makepkg"
    }

    fn to_cli_args(&self) -> Vec<String> {
        let mut args = vec!["-si".to_string()];
        push_noconfirm(&mut args, self.noconfirm);
        args
    }

    fn working_dir(&self) -> Option<&Path> {
        Some(&self.build_dir)
    }
}

// ============================================================================
// AUR helper
// ============================================================================

/// Batch install through the AUR helper. Runs as the invoking user; the
/// helper escalates on its own.
#[derive(Debug, Clone)]
pub struct HelperInstallArgs {
    pub helper: AurHelper,
    pub packages: Vec<PackageName>,
    pub noconfirm: bool,
}

impl CommandArgs for HelperInstallArgs {
    fn program(&self) -> &'static str {
        self.helper.binary()
    }

    fn to_cli_args(&self) -> Vec<String> {
        let mut args = vec!["-S".to_string(), "--needed".to_string()];
        push_noconfirm(&mut args, self.noconfirm);
        push_packages(&mut args, &self.packages);
        args
    }
}
