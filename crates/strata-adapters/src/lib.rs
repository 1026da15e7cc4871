//! Infrastructure adapters for Strata.
//!
//! This crate implements the ports defined in `strata-core::application::ports`
//! and loads project manifests. It contains all I/O.

pub mod filesystem;
pub mod manifest;

// Re-export commonly used adapters
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use manifest::{MANIFEST_FILE, ManifestError, ProjectManifest, STARTER_MANIFEST};
