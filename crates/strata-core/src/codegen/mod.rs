//! Declaration builders: one data-driven generator per [`ArtifactKind`].
//!
//! Builders are pure. They take the project configuration (and an entity for
//! entity-scoped kinds), never touch the filesystem, and import only the
//! packages their declarations reference.

pub mod crud;
pub mod types;

mod auth;
mod errs;
mod events;
mod model;
mod repository;
mod server;
mod trace;
mod usecase;

use crate::domain::{ArtifactKind, DomainError, Entity, ProjectConfig};
use crate::source::{ImportGroup, ImportSpec, SourceTree};

/// Build the tree for one artifact.
///
/// Fails only when an entity-scoped kind is asked for without an entity.
pub fn build(
    kind: ArtifactKind,
    config: &ProjectConfig,
    entity: Option<&Entity>,
) -> Result<SourceTree, DomainError> {
    let tree = match kind {
        ArtifactKind::ErrorModule => errs::build(config),
        ArtifactKind::ServerBootstrap => server::build(config),
        ArtifactKind::AuthModule => auth::build_module(config),
        ArtifactKind::PermissionTable => auth::build_permissions(config),
        ArtifactKind::EventBus => events::build_bus(config),
        entity_kind => {
            let entity = entity.ok_or_else(|| {
                DomainError::InvalidConfig(format!("artifact '{kind}' needs an entity"))
            })?;
            match entity_kind {
                ArtifactKind::Model => model::build(entity, config),
                ArtifactKind::RepositoryInterface => repository::build_interface(entity, config),
                ArtifactKind::RepositoryImpl => repository::build_impl(entity, config),
                ArtifactKind::UseCaseInterface => usecase::build_interface(entity, config),
                ArtifactKind::Interactor => usecase::build_interactor(entity, config),
                ArtifactKind::Interceptor => auth::build_interceptor(entity, config),
                ArtifactKind::EntityEvents => events::build_entity(entity, config),
                _ => trace::build(entity, config),
            }
        }
    };
    Ok(tree)
}

/// Fresh tree with the package clause conventional for `kind`.
fn tree_for(kind: ArtifactKind) -> SourceTree {
    SourceTree::new(kind.package_name())
}

/// Import another generated package.
fn import_package(tree: &mut SourceTree, config: &ProjectConfig, kind: ArtifactKind) {
    tree.import_local(kind.import_path(config));
}

/// Import another generated package under an alias.
fn import_package_as(
    tree: &mut SourceTree,
    config: &ProjectConfig,
    kind: ArtifactKind,
    alias: &str,
) {
    tree.add_import(ImportSpec::aliased(
        ImportGroup::LOCAL,
        alias,
        kind.import_path(config),
    ));
}

/// Single-letter receiver name (`Widget` → `w`).
fn receiver_name(type_name: &str) -> String {
    type_name
        .chars()
        .next()
        .map(|c| c.to_lowercase().collect())
        .unwrap_or_else(|| "x".into())
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::domain::{Entity, FeatureFlags, Field, FieldType, ProjectConfig};

    pub fn widget() -> Entity {
        Entity::new("Widget")
            .with_field(Field::new("name", FieldType::String).filterable().searchable())
            .with_field(Field::new("weight", FieldType::Int))
    }

    pub fn document() -> Entity {
        Entity::new("Document")
            .with_field(Field::new("title", FieldType::String).searchable())
            .with_field(
                Field::new(
                    "status",
                    FieldType::Enum(vec!["draft".into(), "published".into()]),
                )
                .filterable(),
            )
            .with_field(Field::new("published_at", FieldType::Timestamp).nullable())
            .with_field(Field::new("author_id", FieldType::Uuid).references("User"))
            .owned_by("author_id")
    }

    pub fn user() -> Entity {
        Entity::new("User").with_field(Field::new("email", FieldType::String).filterable())
    }

    pub fn all_features() -> FeatureFlags {
        FeatureFlags {
            auth: true,
            permissions: true,
            event_bus: true,
            tracing: true,
        }
    }

    pub fn config(features: FeatureFlags, entities: Vec<Entity>) -> ProjectConfig {
        ProjectConfig::builder()
            .module("acme/svc")
            .features(features)
            .entities(entities)
            .build()
            .unwrap()
    }
}
