//! Application layer for Strata.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (GenerationService, Reconciler)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer and the builders but
//! contains no naming or validation rules itself.

pub mod error;
pub mod ports;
pub mod services;

pub use services::{
    ArtifactRecord, GenerationReport, GenerationService, GeneratorUnit, NoProgress,
    ProgressObserver, ReconcileOutcome, Reconciler,
};

// Re-export port traits (for adapter implementation)
pub use ports::Filesystem;

pub use error::ApplicationError;
