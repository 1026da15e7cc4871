use std::fmt;

use crate::domain::{
    entities::{common::RelativePath, entity::Entity, project::ProjectConfig},
    error::DomainError,
    value_objects::Feature,
};
use crate::source::SourceTree;

/// Whether an artifact is produced once per project or once per entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactScope {
    Layout,
    Entity,
}

/// Every file kind the engine knows how to synthesize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    ErrorModule,
    ServerBootstrap,
    Model,
    RepositoryInterface,
    RepositoryImpl,
    UseCaseInterface,
    Interactor,
    AuthModule,
    PermissionTable,
    Interceptor,
    EventBus,
    EntityEvents,
    TracingDecorator,
}

impl ArtifactKind {
    pub const ALL: [Self; 13] = [
        Self::ErrorModule,
        Self::ServerBootstrap,
        Self::Model,
        Self::RepositoryInterface,
        Self::RepositoryImpl,
        Self::UseCaseInterface,
        Self::Interactor,
        Self::AuthModule,
        Self::PermissionTable,
        Self::Interceptor,
        Self::EventBus,
        Self::EntityEvents,
        Self::TracingDecorator,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ErrorModule => "error-module",
            Self::ServerBootstrap => "server",
            Self::Model => "model",
            Self::RepositoryInterface => "repository",
            Self::RepositoryImpl => "repository-impl",
            Self::UseCaseInterface => "usecase",
            Self::Interactor => "interactor",
            Self::AuthModule => "auth",
            Self::PermissionTable => "permissions",
            Self::Interceptor => "interceptor",
            Self::EventBus => "event-bus",
            Self::EntityEvents => "events",
            Self::TracingDecorator => "tracing",
        }
    }

    /// Feature family that gates this kind.
    pub const fn feature(&self) -> Feature {
        match self {
            Self::ErrorModule
            | Self::ServerBootstrap
            | Self::Model
            | Self::RepositoryInterface
            | Self::RepositoryImpl
            | Self::UseCaseInterface
            | Self::Interactor => Feature::Base,
            Self::AuthModule | Self::Interceptor => Feature::Auth,
            Self::PermissionTable => Feature::Permissions,
            Self::EventBus | Self::EntityEvents => Feature::EventBus,
            Self::TracingDecorator => Feature::Tracing,
        }
    }

    pub const fn scope(&self) -> ArtifactScope {
        match self {
            Self::ErrorModule
            | Self::ServerBootstrap
            | Self::AuthModule
            | Self::PermissionTable
            | Self::EventBus => ArtifactScope::Layout,
            _ => ArtifactScope::Entity,
        }
    }

    /// Go package clause name.
    pub const fn package_name(&self) -> &'static str {
        match self {
            Self::ErrorModule => "errs",
            Self::ServerBootstrap => "main",
            Self::Model => "models",
            Self::RepositoryInterface => "repositories",
            Self::RepositoryImpl => "postgres",
            Self::UseCaseInterface | Self::Interactor => "usecases",
            Self::AuthModule => "auth",
            Self::PermissionTable => "permissions",
            Self::Interceptor => "interceptors",
            Self::EventBus | Self::EntityEvents => "events",
            Self::TracingDecorator => "tracing",
        }
    }

    /// Package directory relative to the output root.
    pub fn package_dir(&self, config: &ProjectConfig) -> String {
        match self {
            Self::ErrorModule => "internal/domain/errs".into(),
            Self::ServerBootstrap => format!("cmd/{}", config.binary_name()),
            Self::Model => "internal/domain/models".into(),
            Self::RepositoryInterface => "internal/domain/repositories".into(),
            Self::RepositoryImpl => "internal/repositories/postgres".into(),
            Self::UseCaseInterface => "internal/domain/usecases".into(),
            Self::Interactor => "internal/usecases".into(),
            Self::AuthModule => "internal/domain/auth".into(),
            Self::PermissionTable => "internal/domain/permissions".into(),
            Self::Interceptor => "internal/interceptors".into(),
            Self::EventBus | Self::EntityEvents => "internal/domain/events".into(),
            Self::TracingDecorator => "internal/usecases/tracing".into(),
        }
    }

    /// Import path of this kind's package inside the generated module.
    pub fn import_path(&self, config: &ProjectConfig) -> String {
        config.import_path(&self.package_dir(config))
    }

    /// Target file path. Entity-scoped kinds require an entity.
    pub fn target_path(
        &self,
        config: &ProjectConfig,
        entity: Option<&Entity>,
    ) -> Result<RelativePath, DomainError> {
        let file = match (self.scope(), entity) {
            (ArtifactScope::Entity, Some(entity)) => format!("{}.go", entity.file_stem()),
            (ArtifactScope::Entity, None) => {
                return Err(DomainError::InvalidConfig(format!(
                    "artifact '{self}' needs an entity"
                )));
            }
            (ArtifactScope::Layout, _) => match self {
                Self::ErrorModule => "errors.go".into(),
                Self::ServerBootstrap => "main.go".into(),
                Self::AuthModule => "auth.go".into(),
                Self::PermissionTable => "permissions.go".into(),
                _ => "bus.go".into(),
            },
        };
        RelativePath::try_new(self.package_dir(config))?.join(file)
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A synthesized file, created per generator unit and consumed once by the
/// reconciler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedArtifact {
    pub kind: ArtifactKind,
    pub path: RelativePath,
    pub tree: SourceTree,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::FeatureFlags;

    fn config() -> ProjectConfig {
        ProjectConfig::builder()
            .module("acme/svc")
            .features(FeatureFlags {
                auth: true,
                permissions: true,
                event_bus: true,
                tracing: true,
            })
            .build()
            .unwrap()
    }

    #[test]
    fn paths_follow_the_catalogue() {
        let config = config();
        let entity = Entity::new("OrderItem");
        let path = |kind: ArtifactKind| {
            kind.target_path(&config, Some(&entity))
                .unwrap()
                .to_string()
        };

        assert_eq!(path(ArtifactKind::ErrorModule), "internal/domain/errs/errors.go");
        assert_eq!(path(ArtifactKind::ServerBootstrap), "cmd/svc/main.go");
        assert_eq!(path(ArtifactKind::Model), "internal/domain/models/order_item.go");
        assert_eq!(
            path(ArtifactKind::RepositoryImpl),
            "internal/repositories/postgres/order_item.go"
        );
        assert_eq!(path(ArtifactKind::Interactor), "internal/usecases/order_item.go");
        assert_eq!(path(ArtifactKind::EventBus), "internal/domain/events/bus.go");
        assert_eq!(
            path(ArtifactKind::TracingDecorator),
            "internal/usecases/tracing/order_item.go"
        );
    }

    #[test]
    fn entity_scope_requires_entity() {
        assert!(ArtifactKind::Model.target_path(&config(), None).is_err());
        assert!(ArtifactKind::AuthModule.target_path(&config(), None).is_ok());
    }

    #[test]
    fn import_paths_are_module_prefixed() {
        assert_eq!(
            ArtifactKind::Model.import_path(&config()),
            "acme/svc/internal/domain/models"
        );
    }

    #[test]
    fn gating_families() {
        assert_eq!(ArtifactKind::PermissionTable.feature(), Feature::Permissions);
        assert_eq!(ArtifactKind::Interceptor.feature(), Feature::Auth);
        assert_eq!(ArtifactKind::EntityEvents.scope(), ArtifactScope::Entity);
    }
}
