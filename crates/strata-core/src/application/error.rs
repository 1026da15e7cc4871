//! Application layer errors.
//!
//! These errors represent failures in orchestration, not business logic.
//! Configuration problems are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur while running generator units.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// A generator unit failed; the run stopped here.
    #[error("Generator unit '{unit}' failed at {path}: {reason}")]
    GeneratorUnitFailed {
        unit: String,
        path: PathBuf,
        reason: String,
    },

    /// Shared state behind a lock was poisoned (in-memory adapters).
    #[error("Store lock poisoned")]
    StoreLockError,
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
                "Make sure no parent of that path is a regular file".into(),
            ],
            Self::GeneratorUnitFailed { path, .. } => vec![
                format!("Files written before {} were kept", path.display()),
                "Fix the cause and run generate again; existing files are preserved".into(),
            ],
            Self::StoreLockError => vec![
                "Another thread panicked while holding the store".into(),
                "Try again in a moment".into(),
            ],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::FilesystemError { .. } | Self::GeneratorUnitFailed { .. } => {
                ErrorCategory::Internal
            }
            Self::StoreLockError => ErrorCategory::Internal,
        }
    }
}
