//! Strata Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the Strata
//! service scaffolder, following hexagonal (ports and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │            strata-cli (CLI)             │
//! │      (Drives the application layer)     │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │          Application Services           │
//! │    (GenerationService, Reconciler)      │
//! └──────────┬───────────────────┬──────────┘
//!            │ builds with       │ writes through
//!            ▼                   ▼
//! ┌────────────────────┐ ┌──────────────────┐
//! │  codegen + source  │ │ Filesystem port  │
//! │ (trees, serializer,│ │ (strata-adapters)│
//! │  lossless parser)  │ └──────────────────┘
//! └─────────┬──────────┘
//!           ▼
//! ┌─────────────────────────────────────────┐
//! │          Domain Layer (Pure Logic)      │
//! │ (ProjectConfig, Entity, ArtifactKind)   │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use strata_core::prelude::*;
//! # fn demo(filesystem: Box<dyn Filesystem>) -> StrataResult<()> {
//! let config = ProjectConfig::builder()
//!     .module("acme/svc")
//!     .entity(
//!         Entity::new("Widget")
//!             .with_field(Field::new("name", FieldType::String))
//!             .with_field(Field::new("weight", FieldType::Int)),
//!     )
//!     .build()?;
//!
//! let service = GenerationService::new(filesystem);
//! let report = service.run(&config, "./out")?;
//! println!("{} files", report.len());
//! # Ok(())
//! # }
//! ```

// Project model, naming rules, artifact catalogue, validation
pub mod domain;

// Structural source representation, serializer and lossless parser
pub mod source;

// One declaration builder per artifact kind
pub mod codegen;

// Orchestration and reconciliation
pub mod application;

// Error types
pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        ArtifactRecord, GenerationReport, GenerationService, GeneratorUnit, ProgressObserver,
        ReconcileOutcome, ports::Filesystem,
    };
    pub use crate::domain::{
        ArtifactKind, Entity, Feature, FeatureFlags, Field, FieldType, ProjectConfig,
        ProjectConfigBuilder, RelativePath,
    };
    pub use crate::error::{StrataError, StrataResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
