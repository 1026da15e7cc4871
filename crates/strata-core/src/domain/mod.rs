//! Core domain layer for Strata.
//!
//! This module contains pure business logic: the project description,
//! naming rules, artifact catalogue and validation. All I/O is handled via
//! ports defined in the application layer.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async**: Domain logic is synchronous
//! - **No I/O**: No filesystem, network, or external calls
//! - **Immutable entities**: All domain objects are Clone + PartialEq
//! - **Rich domain model**: Behavior lives in entities, not services

pub mod entities;
pub mod error;
pub mod naming;
pub mod value_objects;

mod validation;

pub use entities::{
    ArtifactKind, ArtifactScope, Entity, Field, GeneratedArtifact, ProjectConfig,
    ProjectConfigBuilder, RelativePath,
};
pub use error::{DomainError, ErrorCategory};
pub use validation::DomainValidator;
pub use value_objects::{Feature, FeatureFlags, FieldType};

#[cfg(test)]
mod tests {
    use super::*;

    fn widget() -> Entity {
        Entity::new("Widget")
            .with_field(Field::new("name", FieldType::String).filterable().searchable())
            .with_field(Field::new("weight", FieldType::Float).nullable())
    }

    // ========================================================================
    // Project Builder Tests
    // ========================================================================

    #[test]
    fn builder_defaults_name_from_module() {
        let config = ProjectConfig::builder()
            .module("acme/svc")
            .entity(widget())
            .build()
            .unwrap();

        assert_eq!(config.name(), "svc");
        assert_eq!(config.entities().len(), 1);
        assert!(config.is_enabled(Feature::Base));
        assert!(!config.is_enabled(Feature::Auth));
    }

    #[test]
    fn builder_requires_module() {
        let result = ProjectConfig::builder().entity(widget()).build();
        assert!(matches!(
            result,
            Err(DomainError::MissingRequiredField { field: "module" })
        ));
    }

    #[test]
    fn builder_rejects_bad_module() {
        for module in ["", "/abs", "a//b", "with space"] {
            assert!(
                ProjectConfig::builder().module(module).build().is_err(),
                "{module:?} should be rejected"
            );
        }
    }

    #[test]
    fn duplicate_entities_by_file_stem() {
        let result = ProjectConfig::builder()
            .module("acme/svc")
            .entity(Entity::new("OrderItem"))
            .entity(Entity::new("order_item"))
            .build();
        assert!(matches!(result, Err(DomainError::DuplicateEntity { .. })));
    }

    #[test]
    fn unknown_reference_is_rejected() {
        let order = Entity::new("Order")
            .with_field(Field::new("customer_id", FieldType::Uuid).references("Customer"));
        let result = ProjectConfig::builder()
            .module("acme/svc")
            .entity(order)
            .build();
        assert!(matches!(result, Err(DomainError::UnknownReference { .. })));
    }

    #[test]
    fn known_reference_is_accepted() {
        let customer = Entity::new("Customer");
        let order = Entity::new("Order")
            .with_field(Field::new("customer_id", FieldType::Uuid).references("Customer"));
        assert!(ProjectConfig::builder()
            .module("acme/svc")
            .entities([customer, order])
            .build()
            .is_ok());
    }

    // ========================================================================
    // Entity Validation Tests
    // ========================================================================

    #[test]
    fn entity_rejects_reserved_and_duplicate_fields() {
        let reserved = Entity::new("Widget").with_field(Field::new("ID", FieldType::Uuid));
        assert!(matches!(
            reserved.validate(),
            Err(DomainError::InvalidName { kind: "field", .. })
        ));

        let duplicate = Entity::new("Widget")
            .with_field(Field::new("name", FieldType::String))
            .with_field(Field::new("Name", FieldType::String));
        assert!(matches!(
            duplicate.validate(),
            Err(DomainError::DuplicateField { .. })
        ));
    }

    #[test]
    fn entity_rejects_empty_enum() {
        let entity =
            Entity::new("Widget").with_field(Field::new("status", FieldType::Enum(vec![])));
        assert!(matches!(entity.validate(), Err(DomainError::EmptyEnum { .. })));
    }

    #[test]
    fn entity_rejects_enum_values_sharing_a_constant() {
        for values in [["draft", "Draft"], ["on_hold", "on-hold"]] {
            let values = values.map(String::from).to_vec();
            let entity =
                Entity::new("Widget").with_field(Field::new("status", FieldType::Enum(values)));
            assert!(matches!(
                entity.validate(),
                Err(DomainError::InvalidName { kind: "enum value", .. })
            ));
        }

        let distinct = Entity::new("Widget").with_field(Field::new(
            "status",
            FieldType::Enum(vec!["draft".into(), "on_hold".into()]),
        ));
        assert!(distinct.validate().is_ok());
    }

    #[test]
    fn filterable_fields_may_not_shadow_filter_parameters() {
        for name in ["page_size", "pageNumber", "order_by", "ids", "search"] {
            let entity = Entity::new("Widget")
                .with_field(Field::new(name, FieldType::String).filterable());
            assert!(
                matches!(
                    entity.validate(),
                    Err(DomainError::InvalidName { kind: "filterable field", .. })
                ),
                "{name}"
            );
        }

        let unfiltered =
            Entity::new("Widget").with_field(Field::new("search", FieldType::String));
        assert!(unfiltered.validate().is_ok());
    }

    #[test]
    fn owner_must_be_uuid_field() {
        let missing = Entity::new("Doc").owned_by("created_by");
        assert!(matches!(
            missing.validate(),
            Err(DomainError::InvalidOwner { .. })
        ));

        let wrong_type = Entity::new("Doc")
            .with_field(Field::new("created_by", FieldType::String))
            .owned_by("created_by");
        assert!(matches!(
            wrong_type.validate(),
            Err(DomainError::InvalidOwner { .. })
        ));

        let clashing = Entity::new("Doc")
            .with_field(Field::new("owner_id", FieldType::Uuid))
            .owned_by("owner_id");
        assert!(matches!(
            clashing.validate(),
            Err(DomainError::InvalidOwner { .. })
        ));

        let ok = Entity::new("Doc")
            .with_field(Field::new("created_by", FieldType::Uuid))
            .owned_by("created_by");
        assert!(ok.validate().is_ok());
        assert_eq!(ok.owner_field().map(Field::go_name), Some("CreatedBy".into()));
    }

    #[test]
    fn entity_derived_names() {
        let entity = Entity::new("order_item");
        assert_eq!(entity.type_name(), "OrderItem");
        assert_eq!(entity.var_name(), "orderItem");
        assert_eq!(entity.table_name(), "order_items");
        assert_eq!(entity.id_type(), "OrderItemID");
        assert_eq!(entity.filter_type(), "OrderItemFilter");
    }

    // ========================================================================
    // Validator Tests
    // ========================================================================

    #[test]
    fn validator_detects_event_bus_collision() {
        let config = ProjectConfig::builder()
            .module("acme/svc")
            .features(FeatureFlags {
                event_bus: true,
                ..FeatureFlags::default()
            })
            .entity(Entity::new("Bus"))
            .build()
            .unwrap();

        assert!(matches!(
            DomainValidator::validate_project(&config),
            Err(DomainError::PathCollision { .. })
        ));
    }

    #[test]
    fn validator_accepts_bus_entity_without_event_bus() {
        let config = ProjectConfig::builder()
            .module("acme/svc")
            .entity(Entity::new("Bus"))
            .build()
            .unwrap();
        assert!(DomainValidator::validate_project(&config).is_ok());
    }

    #[test]
    fn error_suggestions_are_actionable() {
        let err = DomainError::FeatureDependency {
            feature: "permissions",
            requires: "auth",
        };
        assert_eq!(err.category(), ErrorCategory::Compatibility);
        assert!(err.suggestions()[0].contains("auth = true"));
    }
}
