//! Driven (output) ports - implemented by infrastructure.
//!
//! The `strata-adapters` crate provides implementations.

use crate::error::StrataResult;
use std::path::Path;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `strata_adapters::filesystem::LocalFilesystem` (production)
/// - `strata_adapters::filesystem::MemoryFilesystem` (testing)
///
/// Paths passed in are already joined onto the output root.
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Read a whole file. Fails when the file is missing or unreadable.
    fn read_file(&self, path: &Path) -> StrataResult<Vec<u8>>;

    /// Write content to a file, replacing it.
    fn write_file(&self, path: &Path, content: &[u8]) -> StrataResult<()>;

    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> StrataResult<()>;
}
