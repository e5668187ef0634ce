//! Error handling module for archpkgs
//!
//! Provides the error type for everything between loading the package lists
//! and the last package-manager invocation. Every variant is terminal for the
//! run: the driver logs it and exits with status 1.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for archpkgs
#[derive(Error, Debug)]
pub enum InstallError {
    /// The user declined a confirmation prompt
    #[error("Aborted by user at: {prompt}")]
    UserAbort { prompt: String },

    /// The AUR helper is still missing after the bootstrap build
    #[error("{tool} is still not available after bootstrapping; install it manually and re-run")]
    MissingToolFatal { tool: String },

    /// An external command exited non-zero (or was killed by a signal)
    #[error("Command failed ({}): {command}", describe_exit(.exit_code))]
    CommandFailure {
        command: String,
        exit_code: Option<i32>,
    },

    /// An external command could not be started at all
    #[error("Failed to start `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// A package list exists but could not be read
    #[error("Failed to read package list {}: {source}", .path.display())]
    ListRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading the answer to a confirmation prompt failed
    #[error("Failed to read confirmation: {0}")]
    Prompt(#[source] std::io::Error),

    /// Environment checks failed before any install work started
    #[error("Pre-flight check failed: {0}")]
    Preflight(String),

    /// IO errors outside list loading (bootstrap directory cleanup, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for archpkgs operations
pub type Result<T> = std::result::Result<T, InstallError>;

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "terminated by signal".to_string(),
    }
}

// Convenient error constructors
impl InstallError {
    /// Create a user abort error for the given prompt
    pub fn user_abort(prompt: impl Into<String>) -> Self {
        Self::UserAbort {
            prompt: prompt.into(),
        }
    }

    /// Create a missing tool error
    pub fn missing_tool(tool: impl Into<String>) -> Self {
        Self::MissingToolFatal { tool: tool.into() }
    }

    /// Create a command failure error
    pub fn command_failure(command: impl Into<String>, exit_code: Option<i32>) -> Self {
        Self::CommandFailure {
            command: command.into(),
            exit_code,
        }
    }

    /// Create a pre-flight error
    pub fn preflight(msg: impl Into<String>) -> Self {
        Self::Preflight(msg.into())
    }

    /// Process exit status for this error. There is no recoverable category.
    pub fn exit_code(&self) -> i32 {
        1
    }
}
