//! Field type to Go type mapping.

use crate::domain::{naming, Entity, Field, FieldType};
use crate::source::SourceTree;

pub const UUID_IMPORT: &str = "github.com/google/uuid";
pub const TIME_IMPORT: &str = "time";

/// A Go type expression plus the import it needs, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoType {
    pub expr: String,
    pub import: Option<&'static str>,
}

/// Import `path`, grouping it as standard library when its first path
/// element has no dot.
pub fn import(tree: &mut SourceTree, path: &str) {
    let first = path.split('/').next().unwrap_or_default();
    if first.contains('.') {
        tree.import_external(path);
    } else {
        tree.import_std(path);
    }
}

/// Type of the field as declared on the model struct.
///
/// Nullable scalars become pointers; nullable arrays stay slices since a nil
/// slice already means "absent".
pub fn field_type(entity: &Entity, field: &Field) -> GoType {
    let base = base_type(entity, field, &field.field_type);
    if field.nullable && !field.field_type.is_array() {
        pointer(base)
    } else {
        base
    }
}

/// Type of the field on the `<Entity>Filter` struct. `nil` means "no filter".
pub fn filter_type(entity: &Entity, field: &Field) -> GoType {
    let base = base_type(entity, field, &field.field_type);
    if field.field_type.is_array() {
        base
    } else {
        pointer(base)
    }
}

/// Named string type generated for an enum field (`Widget.status` → `WidgetStatus`).
pub fn enum_type_name(entity: &Entity, field: &Field) -> String {
    format!("{}{}", entity.type_name(), field.go_name())
}

/// Constant name of one enum value (`WidgetStatus` + `on_hold` → `WidgetStatusOnHold`).
pub fn enum_const_name(enum_type: &str, value: &str) -> String {
    format!("{enum_type}{}", naming::to_pascal_case(value))
}

fn base_type(entity: &Entity, field: &Field, ty: &FieldType) -> GoType {
    let plain = |expr: &str| GoType {
        expr: expr.to_string(),
        import: None,
    };
    match ty {
        FieldType::String => plain("string"),
        FieldType::Int => plain("int64"),
        FieldType::Bool => plain("bool"),
        FieldType::Float => plain("float64"),
        FieldType::Timestamp => GoType {
            expr: "time.Time".into(),
            import: Some(TIME_IMPORT),
        },
        // References resolve to the target's identifier alias, which lives in
        // the same models package.
        FieldType::Uuid => match &field.references {
            Some(target) => plain(&format!("{}ID", naming::to_pascal_case(target))),
            None => GoType {
                expr: "uuid.UUID".into(),
                import: Some(UUID_IMPORT),
            },
        },
        FieldType::Enum(_) => plain(&enum_type_name(entity, field)),
        FieldType::Array(inner) => {
            let inner = base_type(entity, field, inner);
            GoType {
                expr: format!("[]{}", inner.expr),
                import: inner.import,
            }
        }
    }
}

fn pointer(ty: GoType) -> GoType {
    GoType {
        expr: format!("*{}", ty.expr),
        ..ty
    }
}
