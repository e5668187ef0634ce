//! Append-only install log
//!
//! Every line goes to two places: the console and the log file. Lines look
//! like `[2024-05-01 13:37:00] Installing 3 pacman packages` and use local
//! time. The file is opened in append mode and never truncated or rotated.
//!
//! This is the user-facing record of a run. Diagnostic output goes through
//! `tracing` instead and is controlled by `RUST_LOG`.

use chrono::Local;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

/// Timestamp format used for every log line
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Console + file log sink, owned by `main` for the whole run.
pub struct LogSink {
    console: Box<dyn Write>,
    file: Option<Box<dyn Write>>,
    file_failed: bool,
}

impl LogSink {
    /// Open `path` for appending (creating it and its parent directory if
    /// needed) and mirror every line to stdout.
    pub fn open(path: &Path) -> io::Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file: File = OpenOptions::new().create(true).append(true).open(path)?;
        tracing::debug!("Install log opened at {}", path.display());
        Ok(Self::from_writers(Box::new(io::stdout()), Some(Box::new(file))))
    }

    /// Build a sink from arbitrary writers. `file` may be `None` to log to the
    /// console only.
    pub fn from_writers(console: Box<dyn Write>, file: Option<Box<dyn Write>>) -> Self {
        Self {
            console,
            file,
            file_failed: false,
        }
    }

    /// Append one timestamped line to the console and the log file.
    ///
    /// Write failures never abort a run. A broken log file is reported once
    /// through `tracing` and then ignored.
    pub fn log(&mut self, message: impl AsRef<str>) {
        let timestamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
        let line = format_line(&timestamp, message.as_ref());

        if let Err(e) = writeln!(self.console, "{}", line).and_then(|_| self.console.flush()) {
            tracing::warn!("Failed to write log line to console: {}", e);
        }

        if let Some(file) = self.file.as_mut() {
            let result = writeln!(file, "{}", line).and_then(|_| file.flush());
            if let Err(e) = result {
                if !self.file_failed {
                    tracing::warn!("Failed to append to install log: {}", e);
                    self.file_failed = true;
                }
            }
        }
    }
}

/// Render a single log line
fn format_line(timestamp: &str, message: &str) -> String {
    format!("[{}] {}", timestamp, message)
}
