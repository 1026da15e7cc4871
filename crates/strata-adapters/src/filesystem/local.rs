//! Local filesystem adapter using std::fs.

use std::io;
use std::path::Path;

use tracing::trace;

use strata_core::{
    application::{ApplicationError, ports::Filesystem},
    error::{StrataError, StrataResult},
};

/// Production filesystem implementation using `std::fs`.
///
/// Writes are plain `std::fs::write` calls, not atomic renames.
#[derive(Debug, Clone, Copy)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    /// Create a new local filesystem adapter.
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for LocalFilesystem {
    fn read_file(&self, path: &Path) -> StrataResult<Vec<u8>> {
        std::fs::read(path).map_err(|e| map_io_error(path, e, "read file"))
    }

    fn write_file(&self, path: &Path, content: &[u8]) -> StrataResult<()> {
        trace!(path = %path.display(), bytes = content.len(), "write");
        std::fs::write(path, content).map_err(|e| map_io_error(path, e, "write file"))
    }

    fn create_dir_all(&self, path: &Path) -> StrataResult<()> {
        trace!(path = %path.display(), "mkdir -p");
        std::fs::create_dir_all(path).map_err(|e| map_io_error(path, e, "create directory"))
    }
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> StrataError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("Failed to {}: {}", operation, e),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn writes_and_reads_bytes() {
        let temp = TempDir::new().unwrap();
        let fs = LocalFilesystem::new();
        let dir = temp.path().join("a/b");
        let file = dir.join("c.go");

        fs.create_dir_all(&dir).unwrap();
        fs.write_file(&file, b"package c\n").unwrap();

        assert!(file.is_file());
        assert_eq!(fs.read_file(&file).unwrap(), b"package c\n");
    }

    #[test]
    fn missing_file_is_a_filesystem_error() {
        let temp = TempDir::new().unwrap();
        let err = LocalFilesystem::new()
            .read_file(&temp.path().join("nope.go"))
            .unwrap_err();
        assert!(matches!(
            err,
            StrataError::Application(ApplicationError::FilesystemError { .. })
        ));
    }

    #[test]
    fn directory_under_a_file_fails() {
        let temp = TempDir::new().unwrap();
        let fs = LocalFilesystem::new();
        let blocker = temp.path().join("internal");
        fs.write_file(&blocker, b"not a directory").unwrap();

        assert!(fs.create_dir_all(&blocker.join("domain")).is_err());
    }
}
