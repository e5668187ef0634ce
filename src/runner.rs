//! Command execution
//!
//! All external programs run through a [`CommandRunner`]. The installer only
//! ever sees exit statuses and search-path presence; no output is parsed.
//!
//! [`SystemRunner`] runs commands synchronously with inherited stdio so that
//! `sudo` password prompts and pacman's own questions reach the terminal.
//! There is no timeout: a hung package manager hangs the run.

use crate::commands::Invocation;
use crate::error::{InstallError, Result};
use std::process::Command;
use tracing::{debug, info};

/// Exit information from a finished command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code (None if terminated by signal).
    pub exit_code: Option<i32>,
    /// Whether the command exited with status 0.
    pub success: bool,
}

impl CommandOutput {
    pub fn success() -> Self {
        Self {
            exit_code: Some(0),
            success: true,
        }
    }

    pub fn failure(exit_code: Option<i32>) -> Self {
        Self {
            exit_code,
            success: false,
        }
    }

    /// Turn a non-zero exit into [`InstallError::CommandFailure`].
    pub fn ensure_success(&self, invocation: &Invocation) -> Result<()> {
        if self.success {
            Ok(())
        } else {
            Err(InstallError::command_failure(
                invocation.to_string(),
                self.exit_code,
            ))
        }
    }
}

/// Executes invocations and answers search-path queries.
pub trait CommandRunner {
    /// Run to completion and report how it exited.
    ///
    /// `Err` only when the program could not be started.
    fn run(&mut self, invocation: &Invocation) -> Result<CommandOutput>;

    /// Whether `program` resolves on the search path.
    fn is_available(&self, program: &str) -> bool;
}

/// Runs real processes.
#[derive(Debug, Default)]
pub struct SystemRunner;

impl SystemRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for SystemRunner {
    fn run(&mut self, invocation: &Invocation) -> Result<CommandOutput> {
        info!("Running: {}", invocation);

        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args);
        if let Some(dir) = &invocation.working_dir {
            cmd.current_dir(dir);
        }

        let status = cmd.status().map_err(|e| InstallError::Spawn {
            command: invocation.to_string(),
            source: e,
        })?;

        debug!("{} exited with {:?}", invocation.program, status.code());
        if status.success() {
            Ok(CommandOutput::success())
        } else {
            Ok(CommandOutput::failure(status.code()))
        }
    }

    fn is_available(&self, program: &str) -> bool {
        match which::which(program) {
            Ok(path) => {
                debug!("Found {} at {}", program, path.display());
                true
            }
            Err(e) => {
                debug!("{} not found on PATH: {}", program, e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn inv(program: &str, args: &[&str]) -> Invocation {
        Invocation {
            program: program.to_string(),
            args: args.iter().map(|s| s.to_string()).collect(),
            working_dir: None,
        }
    }

    #[test]
    fn test_ensure_success() {
        let invocation = inv("pacman", &["-Syu"]);
        assert!(CommandOutput::success().ensure_success(&invocation).is_ok());

        let err = CommandOutput::failure(Some(1))
            .ensure_success(&invocation)
            .unwrap_err();
        match err {
            InstallError::CommandFailure { command, exit_code } => {
                assert_eq!(command, "pacman -Syu");
                assert_eq!(exit_code, Some(1));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_system_runner_reports_exit_codes() {
        let mut runner = SystemRunner::new();
        let ok = runner.run(&inv("sh", &["-c", "exit 0"])).unwrap();
        assert!(ok.success);

        let failed = runner.run(&inv("sh", &["-c", "exit 3"])).unwrap();
        assert!(!failed.success);
        assert_eq!(failed.exit_code, Some(3));
    }

    #[test]
    fn test_system_runner_honours_working_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut runner = SystemRunner::new();
        let invocation = Invocation {
            program: "sh".to_string(),
            args: vec!["-c".to_string(), "touch marker".to_string()],
            working_dir: Some(PathBuf::from(dir.path())),
        };
        assert!(runner.run(&invocation).unwrap().success);
        assert!(dir.path().join("marker").exists());
    }

    #[test]
    fn test_system_runner_spawn_failure() {
        let mut runner = SystemRunner::new();
        let result = runner.run(&inv("archpkgs-definitely-not-a-program", &[]));
        assert!(matches!(result, Err(InstallError::Spawn { .. })));
    }

    #[test]
    fn test_is_available() {
        let runner = SystemRunner::new();
        assert!(runner.is_available("sh"));
        assert!(!runner.is_available("archpkgs-definitely-not-a-program"));
    }
}
