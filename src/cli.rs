use clap::error::ErrorKind;
use clap::Parser;
use std::path::PathBuf;

use crate::config::ConfigOverrides;
use crate::types::{AurHelper, ExecutionMode};

/// archpkgs - install pacman and AUR package lists
///
/// Reads pacman.txt and aur.txt (one package per line, `#` starts a comment),
/// removes duplicates, lets pacman own anything listed in both, and installs
/// everything after a confirmation. The AUR helper is built from the AUR
/// first if it is missing.
#[derive(Parser, Debug)]
#[command(name = "archpkgs")]
#[command(about = "Install pacman and AUR package lists on Arch Linux")]
#[command(version)]
pub struct Cli {
    /// Answer yes to every prompt (passes --noconfirm to pacman and the AUR helper)
    #[arg(short = 'y', long = "yes")]
    pub yes: bool,

    /// Print the commands that would run instead of running them
    #[arg(long)]
    pub dry_run: bool,

    /// Directory holding the package lists and the install log
    #[arg(long, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// JSON config file (default: archpkgs.json in --dir, if present)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Package list for pacman (default: pacman.txt)
    #[arg(long, value_name = "FILE")]
    pub pacman_list: Option<PathBuf>,

    /// Package list for the AUR helper (default: aur.txt)
    #[arg(long, value_name = "FILE")]
    pub aur_list: Option<PathBuf>,

    /// Install log to append to (default: install.log)
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// AUR helper to use
    #[arg(long, value_name = "HELPER")]
    pub helper: Option<AurHelper>,
}

/// What the binary should do after argument parsing
#[derive(Debug)]
pub enum ParsedArgs {
    /// Normal run
    Run(Cli),
    /// Help or version text to print on stdout, then exit 0
    Info(String),
    /// Usage error to print on stderr, then exit 1
    Error(String),
}

impl Cli {
    /// Parse the process arguments.
    pub fn parse_args() -> ParsedArgs {
        Self::parse_from_args(std::env::args_os())
    }

    /// Parse an explicit argument list (first item is the program name).
    ///
    /// Unlike `Parser::parse`, this never exits: usage errors map to exit
    /// status 1 instead of clap's 2, so the caller decides.
    pub fn parse_from_args<I, T>(args: I) -> ParsedArgs
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        match Self::try_parse_from(args) {
            Ok(cli) => ParsedArgs::Run(cli),
            Err(e) => match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                    ParsedArgs::Info(e.to_string())
                }
                _ => ParsedArgs::Error(e.to_string()),
            },
        }
    }

    /// Execution mode for the whole run
    pub fn execution_mode(&self) -> ExecutionMode {
        ExecutionMode::from_flags(self.yes, self.dry_run)
    }

    /// Configuration values given on the command line
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            base_dir: self.dir.clone(),
            config_file: self.config.clone(),
            pacman_list: self.pacman_list.clone(),
            aur_list: self.aur_list.clone(),
            log_file: self.log_file.clone(),
            aur_helper: self.helper,
        }
    }
}
