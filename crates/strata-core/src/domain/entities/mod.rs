pub mod artifact;
pub mod common;
pub mod entity;
pub mod project;

pub use crate::domain::DomainError;
pub use artifact::{ArtifactKind, ArtifactScope, GeneratedArtifact};
pub use common::RelativePath;
pub use entity::{Entity, Field};
pub use project::{ProjectConfig, ProjectConfigBuilder};
