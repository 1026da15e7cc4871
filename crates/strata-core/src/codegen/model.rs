use crate::domain::{naming, Entity, Feature, Field, FieldType, ProjectConfig};
use crate::source::{
    FuncDecl, Param, Signature, SourceTree, StructField, StructTag, TypeDecl, ValueDecl, ValueSpec,
};

use super::types::{self, UUID_IMPORT};
use super::{receiver_name, tree_for};
use crate::domain::ArtifactKind;

/// `models/<entity>.go`: identifier alias, enum types, the entity struct,
/// its filter, and the `OwnerID` capability when permissions apply.
pub(super) fn build(entity: &Entity, config: &ProjectConfig) -> SourceTree {
    let mut tree = tree_for(ArtifactKind::Model);
    let name = entity.type_name();

    tree.import_external(UUID_IMPORT);
    tree.push(
        TypeDecl::alias(entity.id_type(), "uuid.UUID")
            .doc(format!("{} uniquely identifies a {name}.", entity.id_type())),
    );

    for field in &entity.fields {
        if let FieldType::Enum(values) = field.field_type.element() {
            push_enum(&mut tree, entity, field, values);
        }
    }

    let mut fields = vec![
        StructField::new("ID", entity.id_type()).tag(tag_for("id")),
    ];
    for field in &entity.fields {
        let ty = types::field_type(entity, field);
        if let Some(import) = ty.import {
            types::import(&mut tree, import);
        }
        fields.push(StructField::new(field.go_name(), ty.expr).tag(tag_for(&field.column())));
    }
    tree.push(
        TypeDecl::structure(&name, fields).doc(format!("{name} is the persisted {name} entity.")),
    );

    tree.push(filter_struct(entity));

    if config.is_enabled(Feature::Permissions) {
        if let Some(owner) = entity.owner_field() {
            tree.push(owner_method(entity, owner));
        }
    }

    tree
}

fn tag_for(column: &str) -> StructTag {
    StructTag::new().with("json", column).with("db", column)
}

fn json_tag(key: &str) -> StructTag {
    StructTag::new().with("json", format!("{key},omitempty"))
}

fn push_enum(tree: &mut SourceTree, entity: &Entity, field: &Field, values: &[String]) {
    let enum_type = types::enum_type_name(entity, field);
    tree.push(
        TypeDecl::defined(&enum_type, "string")
            .doc(format!("{enum_type} enumerates the values of {}.{}.", entity.type_name(), field.go_name())),
    );

    let specs = values
        .iter()
        .map(|value| {
            ValueSpec::new(types::enum_const_name(&enum_type, value))
                .typed(&enum_type)
                .value(format!("\"{value}\""))
        })
        .collect();
    tree.push(ValueDecl::new(specs).into_const());
}

fn filter_struct(entity: &Entity) -> TypeDecl {
    let mut fields = vec![
        StructField::new("IDs", format!("[]{}", entity.id_type())).tag(json_tag("ids")),
    ];
    for field in entity.fields.iter().filter(|f| f.filterable) {
        let ty = types::filter_type(entity, field);
        fields.push(StructField::new(field.go_name(), ty.expr).tag(json_tag(&field.column())));
    }
    if entity.has_search() {
        fields.push(StructField::new("Search", "*string").tag(json_tag("search")));
    }
    fields.extend([
        StructField::new("PageSize", "uint64").tag(json_tag("page_size")),
        StructField::new("PageNumber", "uint64").tag(json_tag("page_number")),
        StructField::new("OrderBy", "[]string").tag(json_tag("order_by")),
    ]);

    let searchable: Vec<String> = entity
        .fields
        .iter()
        .filter(|f| f.searchable)
        .map(Field::go_name)
        .collect();
    let mut doc = format!("{} narrows List and Count queries.", entity.filter_type());
    if !searchable.is_empty() {
        doc.push_str(&format!("\nSearch matches {}.", searchable.join(", ")));
    }

    TypeDecl::structure(entity.filter_type(), fields).doc(doc)
}

fn owner_method(entity: &Entity, owner: &Field) -> FuncDecl {
    let name = entity.type_name();
    let recv = receiver_name(&name);
    let access = format!("{recv}.{}", owner.go_name());

    let body: Vec<String> = if owner.nullable {
        vec![
            format!("if {access} == nil {{"),
            "\treturn uuid.Nil".into(),
            "}".into(),
            String::new(),
            format!("return *{access}"),
        ]
    } else {
        vec![format!("return {access}")]
    };

    FuncDecl::method(
        Param::new(&recv, format!("*{name}")),
        Signature::new("OwnerID").returns("uuid.UUID"),
    )
    .doc(format!(
        "OwnerID returns the subject that owns this {name}, stored in {}.",
        naming::to_pascal_case(&owner.name)
    ))
    .lines(body)
}
