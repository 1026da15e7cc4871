use std::collections::HashSet;
use std::fmt;

use crate::domain::{
    entities::entity::Entity,
    error::DomainError,
    naming,
    value_objects::{Feature, FeatureFlags},
};

/// A validated description of the service to generate.
///
/// Immutable once built; the orchestrator borrows it for a whole run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectConfig {
    module: String,
    name: String,
    features: FeatureFlags,
    entities: Vec<Entity>,
}

impl ProjectConfig {
    pub fn builder() -> ProjectConfigBuilder {
        ProjectConfigBuilder::default()
    }

    /// Root import prefix, e.g. `acme/svc`.
    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn features(&self) -> FeatureFlags {
        self.features
    }

    pub fn is_enabled(&self, feature: Feature) -> bool {
        self.features.is_enabled(feature)
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Full import path of a package inside the generated module.
    pub fn import_path(&self, package_dir: &str) -> String {
        format!("{}/{}", self.module, package_dir)
    }

    /// Directory name of the server bootstrap under `cmd/`.
    pub fn binary_name(&self) -> String {
        naming::to_kebab_case(&self.name)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        validate_module(&self.module)?;

        if !naming::is_valid_identifier(&self.name) {
            return Err(DomainError::InvalidName {
                kind: "project",
                name: self.name.clone(),
                reason: "not a valid identifier".into(),
            });
        }

        self.features.validate()?;

        let mut seen = HashSet::new();
        for entity in &self.entities {
            entity.validate()?;
            if !seen.insert(entity.file_stem()) {
                return Err(DomainError::DuplicateEntity {
                    name: entity.name.clone(),
                });
            }
        }

        for entity in &self.entities {
            for field in &entity.fields {
                let Some(target) = &field.references else {
                    continue;
                };
                if !seen.contains(&naming::to_snake_case(target)) {
                    return Err(DomainError::UnknownReference {
                        entity: entity.name.clone(),
                        field: field.name.clone(),
                        target: target.clone(),
                    });
                }
            }
        }

        Ok(())
    }
}

impl fmt::Display for ProjectConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}, {} entities)",
            self.name,
            self.module,
            self.entities.len()
        )
    }
}

fn validate_module(module: &str) -> Result<(), DomainError> {
    let reason = if module.is_empty() {
        Some("module path cannot be empty")
    } else if module.starts_with('/') || module.ends_with('/') {
        Some("module path cannot start or end with '/'")
    } else if module.contains("//") {
        Some("module path cannot contain empty segments")
    } else if module.chars().any(|c| c.is_whitespace() || c == '\\' || c == '"') {
        Some("module path cannot contain whitespace, '\\' or '\"'")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(DomainError::InvalidName {
            kind: "module",
            name: module.to_string(),
            reason: reason.into(),
        }),
        None => Ok(()),
    }
}

// ── Builder ───────────────────────────────────────────────────────────────────

/// Builder for [`ProjectConfig`]. `build` validates.
#[derive(Debug, Default)]
pub struct ProjectConfigBuilder {
    module: Option<String>,
    name: Option<String>,
    features: FeatureFlags,
    entities: Vec<Entity>,
}

impl ProjectConfigBuilder {
    pub fn module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn features(mut self, features: FeatureFlags) -> Self {
        self.features = features;
        self
    }

    pub fn entity(mut self, entity: Entity) -> Self {
        self.entities.push(entity);
        self
    }

    pub fn entities(mut self, entities: impl IntoIterator<Item = Entity>) -> Self {
        self.entities.extend(entities);
        self
    }

    /// Assemble and validate.
    ///
    /// When no name is given the last module path segment is used
    /// (`acme/svc` → `svc`).
    pub fn build(self) -> Result<ProjectConfig, DomainError> {
        let module = self
            .module
            .ok_or(DomainError::MissingRequiredField { field: "module" })?;

        let name = match self.name {
            Some(name) => name,
            None => module.rsplit('/').next().unwrap_or_default().to_string(),
        };

        let config = ProjectConfig {
            module,
            name,
            features: self.features,
            entities: self.entities,
        };
        config.validate()?;
        Ok(config)
    }
}
