//! Application services - orchestrate use cases.
//!
//! `GenerationService` plans and runs generator units; `Reconciler` applies
//! the no-clobber write policy to each resulting artifact.

pub mod generation_service;
pub mod reconciler;

pub use generation_service::{
    ArtifactRecord, GenerationReport, GenerationService, GeneratorUnit, NoProgress,
    ProgressObserver,
};
pub use reconciler::{ReconcileOutcome, Reconciler};
