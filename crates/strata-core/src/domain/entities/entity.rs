use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::domain::{
    error::DomainError,
    naming::{self, is_valid_identifier},
    value_objects::FieldType,
};

/// Name every entity's implicit primary key uses; fields may not reuse it.
const RESERVED_FIELD: &str = "id";

/// Capability method generated on owned entities.
const OWNER_METHOD: &str = "OwnerID";

/// Keys of the fixed members of every generated `<Entity>Filter` struct.
const FILTER_KEYS: [&str; 5] = ["ids", "search", "page_size", "page_number", "order_by"];

/// One typed attribute of an [`Entity`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub field_type: FieldType,
    pub nullable: bool,
    /// Exposed as an equality filter on list/count queries.
    pub filterable: bool,
    /// Included in free-text search.
    pub searchable: bool,
    /// Entity this field points at (foreign key), if any.
    pub references: Option<String>,
}

impl Field {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            nullable: false,
            filterable: false,
            searchable: false,
            references: None,
        }
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn filterable(mut self) -> Self {
        self.filterable = true;
        self
    }

    pub fn searchable(mut self) -> Self {
        self.searchable = true;
        self
    }

    pub fn references(mut self, entity: impl Into<String>) -> Self {
        self.references = Some(entity.into());
        self
    }

    /// Exported Go field name (`weight` → `Weight`).
    pub fn go_name(&self) -> String {
        naming::to_pascal_case(&self.name)
    }

    /// Column and serialization key (`Weight` → `weight`).
    pub fn column(&self) -> String {
        naming::to_snake_case(&self.name)
    }
}

/// A persisted domain object described by the project configuration.
///
/// Entities are referenced, never mutated, by builders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub name: String,
    pub fields: Vec<Field>,
    /// Field holding the owning subject's id.
    pub owned_by: Option<String>,
}

impl Entity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            owned_by: None,
        }
    }

    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn owned_by(mut self, field: impl Into<String>) -> Self {
        self.owned_by = Some(field.into());
        self
    }

    /// Any field participates in free-text search.
    pub fn has_search(&self) -> bool {
        self.fields.iter().any(|f| f.searchable)
    }

    /// Any field references another entity.
    pub fn has_foreign_keys(&self) -> bool {
        self.fields.iter().any(|f| f.references.is_some())
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        let wanted = naming::to_snake_case(name);
        self.fields.iter().find(|f| f.column() == wanted)
    }

    /// The owner field, if the entity declares one.
    pub fn owner_field(&self) -> Option<&Field> {
        self.owned_by.as_deref().and_then(|name| self.field(name))
    }

    /// Go type name (`order_item` → `OrderItem`).
    pub fn type_name(&self) -> String {
        naming::to_pascal_case(&self.name)
    }

    /// Unexported identifier (`OrderItem` → `orderItem`).
    pub fn var_name(&self) -> String {
        naming::to_camel_case(&self.name)
    }

    /// File stem shared by every per-entity artifact (`OrderItem` → `order_item`).
    pub fn file_stem(&self) -> String {
        naming::to_snake_case(&self.name)
    }

    /// SQL table name (`OrderItem` → `order_items`).
    pub fn table_name(&self) -> String {
        naming::pluralize(&self.file_stem())
    }

    /// Identifier type name (`Widget` → `WidgetID`).
    pub fn id_type(&self) -> String {
        format!("{}ID", self.type_name())
    }

    /// Filter type name (`Widget` → `WidgetFilter`).
    pub fn filter_type(&self) -> String {
        format!("{}Filter", self.type_name())
    }

    /// Check names, uniqueness, enum values and the owner field.
    ///
    /// References to other entities are checked by `ProjectConfig::validate`,
    /// which knows the full entity list.
    pub fn validate(&self) -> Result<(), DomainError> {
        if !is_valid_identifier(&self.name) {
            return Err(DomainError::InvalidName {
                kind: "entity",
                name: self.name.clone(),
                reason: "not a valid identifier".into(),
            });
        }
        if naming::is_go_keyword(&self.var_name()) {
            return Err(DomainError::InvalidName {
                kind: "entity",
                name: self.name.clone(),
                reason: format!("'{}' is a Go keyword", self.var_name()),
            });
        }

        let mut seen = HashSet::new();
        for field in &self.fields {
            if !is_valid_identifier(&field.name) {
                return Err(DomainError::InvalidName {
                    kind: "field",
                    name: field.name.clone(),
                    reason: "not a valid identifier".into(),
                });
            }
            if field.column() == RESERVED_FIELD {
                return Err(DomainError::InvalidName {
                    kind: "field",
                    name: field.name.clone(),
                    reason: "'id' is generated for every entity".into(),
                });
            }
            if field.filterable && FILTER_KEYS.contains(&field.column().as_str()) {
                return Err(DomainError::InvalidName {
                    kind: "filterable field",
                    name: field.name.clone(),
                    reason: format!("'{}' is a built-in filter parameter", field.column()),
                });
            }
            if !seen.insert(field.column()) {
                return Err(DomainError::DuplicateField {
                    entity: self.name.clone(),
                    field: field.name.clone(),
                });
            }
            if let FieldType::Enum(values) = field.field_type.element() {
                if values.is_empty() {
                    return Err(DomainError::EmptyEnum {
                        entity: self.name.clone(),
                        field: field.name.clone(),
                    });
                }
                if let Some(bad) = values.iter().find(|v| !is_valid_identifier(v)) {
                    return Err(DomainError::InvalidName {
                        kind: "enum value",
                        name: bad.clone(),
                        reason: format!("in field '{}.{}'", self.name, field.name),
                    });
                }
                let mut consts = HashSet::new();
                let collision = values
                    .iter()
                    .find(|v| !consts.insert(naming::to_pascal_case(v)));
                if let Some(dup) = collision {
                    return Err(DomainError::InvalidName {
                        kind: "enum value",
                        name: dup.clone(),
                        reason: format!(
                            "collides with another value of '{}.{}' as constant suffix '{}'",
                            self.name,
                            field.name,
                            naming::to_pascal_case(dup)
                        ),
                    });
                }
            }
        }

        if let Some(owner) = &self.owned_by {
            let field = self.field(owner).ok_or_else(|| DomainError::InvalidOwner {
                entity: self.name.clone(),
                field: owner.clone(),
                reason: "no such field".into(),
            })?;
            if !field.field_type.is_uuid() {
                return Err(DomainError::InvalidOwner {
                    entity: self.name.clone(),
                    field: owner.clone(),
                    reason: format!("field type is '{}', expected 'uuid'", field.field_type),
                });
            }
            if field.go_name() == OWNER_METHOD {
                return Err(DomainError::InvalidOwner {
                    entity: self.name.clone(),
                    field: owner.clone(),
                    reason: format!("the field would clash with the {OWNER_METHOD}() method"),
                });
            }
        }

        Ok(())
    }
}
