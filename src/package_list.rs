//! Package list loading
//!
//! List files are plain text, one package per line. `#` starts a comment that
//! runs to the end of the line; there is no escaping. Blank lines are skipped.
//! A missing file is an empty list, since either list is optional.

use crate::error::{InstallError, Result};
use crate::log_sink::LogSink;
use crate::types::{PackageName, PackageSource};
use std::io::ErrorKind;
use std::path::Path;

/// Ordered package names from one list file, tagged with their source.
///
/// Duplicates inside one file are kept here; the reconciler removes them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageList {
    pub source: PackageSource,
    pub packages: Vec<PackageName>,
}

impl PackageList {
    pub fn new(source: PackageSource, packages: Vec<PackageName>) -> Self {
        Self { source, packages }
    }

    pub fn empty(source: PackageSource) -> Self {
        Self::new(source, Vec::new())
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

/// Parse list-file text into package names, preserving order.
pub fn parse_package_list(content: &str) -> Vec<PackageName> {
    content
        .lines()
        .filter_map(|line| {
            let without_comment = match line.find('#') {
                Some(idx) => &line[..idx],
                None => line,
            };
            PackageName::new(without_comment)
        })
        .collect()
}

/// Load the list at `path`.
///
/// Returns an empty list if the file does not exist. Any other read failure
/// (permissions, a directory in place of the file) is an error.
pub fn load_package_list(
    path: &Path,
    source: PackageSource,
    log: &mut LogSink,
) -> Result<PackageList> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            log.log(format!(
                "No {} list at {}, skipping",
                source,
                path.display()
            ));
            return Ok(PackageList::empty(source));
        }
        Err(source_err) => {
            return Err(InstallError::ListRead {
                path: path.to_path_buf(),
                source: source_err,
            });
        }
    };

    let packages = parse_package_list(&content);
    tracing::debug!("Parsed {:?} from {}", packages, path.display());
    log.log(format!(
        "Loaded {} {} package(s) from {}",
        packages.len(),
        source,
        path.display()
    ));

    Ok(PackageList::new(source, packages))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[PackageName]) -> Vec<&str> {
        list.iter().map(PackageName::as_str).collect()
    }

    fn quiet_sink() -> LogSink {
        LogSink::from_writers(Box::new(std::io::sink()), None)
    }

    #[test]
    fn test_parse_skips_comments_and_blanks() {
        let parsed = parse_package_list("git\n#comment\n\nvim\n");
        assert_eq!(names(&parsed), vec!["git", "vim"]);
    }

    #[test]
    fn test_parse_strips_trailing_comments() {
        let parsed = parse_package_list("  firefox   # browser\nhtop#top\n   # indented comment\n");
        assert_eq!(names(&parsed), vec!["firefox", "htop"]);
    }

    #[test]
    fn test_parse_keeps_duplicates_and_order() {
        let parsed = parse_package_list("zsh\nbash\nzsh\n");
        assert_eq!(names(&parsed), vec!["zsh", "bash", "zsh"]);
    }

    #[test]
    fn test_parse_handles_crlf() {
        let parsed = parse_package_list("git\r\nvim\r\n");
        assert_eq!(names(&parsed), vec!["git", "vim"]);
    }

    #[test]
    fn test_parse_empty() {
        assert!(parse_package_list("").is_empty());
        assert!(parse_package_list("\n\n# only comments\n").is_empty());
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let mut log = quiet_sink();
        let list = load_package_list(
            &dir.path().join("nope.txt"),
            PackageSource::Secondary,
            &mut log,
        )
        .unwrap();
        assert!(list.is_empty());
        assert_eq!(list.source, PackageSource::Secondary);
    }

    #[test]
    fn test_load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pacman.txt");
        std::fs::write(&path, "base-devel\n# tools\nripgrep\n").unwrap();

        let mut log = quiet_sink();
        let list = load_package_list(&path, PackageSource::Primary, &mut log).unwrap();
        assert_eq!(names(&list.packages), vec!["base-devel", "ripgrep"]);
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_load_directory_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut log = quiet_sink();
        let result = load_package_list(dir.path(), PackageSource::Primary, &mut log);
        assert!(matches!(result, Err(InstallError::ListRead { .. })));
    }
}
