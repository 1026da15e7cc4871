use std::collections::HashMap;

use crate::domain::{
    entities::{ArtifactKind, ArtifactScope, ProjectConfig},
    error::DomainError,
};

/// Centralized domain validation.
///
/// All validation logic lives here, not scattered across callers.
pub struct DomainValidator;

impl DomainValidator {
    /// Validate a configuration and check that every enabled artifact maps to
    /// its own file.
    pub fn validate_project(config: &ProjectConfig) -> Result<(), DomainError> {
        config.validate()?;
        Self::validate_paths(config)
    }

    fn validate_paths(config: &ProjectConfig) -> Result<(), DomainError> {
        let mut claimed: HashMap<String, String> = HashMap::new();

        for kind in ArtifactKind::ALL {
            if !config.is_enabled(kind.feature()) {
                continue;
            }
            let owners: Vec<(String, Option<_>)> = match kind.scope() {
                ArtifactScope::Layout => vec![(kind.to_string(), None)],
                ArtifactScope::Entity => config
                    .entities()
                    .iter()
                    .map(|e| (format!("{kind} for {}", e.name), Some(e)))
                    .collect(),
            };

            for (owner, entity) in owners {
                let path = kind.target_path(config, entity)?.to_string();
                if let Some(first) = claimed.get(&path) {
                    return Err(DomainError::PathCollision {
                        path,
                        first: first.clone(),
                        second: owner,
                    });
                }
                claimed.insert(path, owner);
            }
        }

        Ok(())
    }
}
