// ============================================================================
// domain/error.rs - CONFIGURATION ERROR DOMAIN
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// Every variant describes a project description that cannot be generated.
/// These surface before any generator unit runs.
///
/// All errors are:
/// - Cloneable
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    #[error("Invalid project configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid {kind} name '{name}': {reason}")]
    InvalidName {
        kind: &'static str,
        name: String,
        reason: String,
    },

    #[error("Duplicate entity '{name}' (entities must map to distinct files)")]
    DuplicateEntity { name: String },

    #[error("Duplicate field '{field}' in entity '{entity}'")]
    DuplicateField { entity: String, field: String },

    #[error("Enum field '{entity}.{field}' declares no values")]
    EmptyEnum { entity: String, field: String },

    #[error("Absolute paths not allowed: {path}")]
    AbsolutePathNotAllowed { path: String },

    #[error("Path escapes the output root: {path}")]
    PathEscapesRoot { path: String },

    #[error("Generated file '{path}' is claimed by both {first} and {second}")]
    PathCollision {
        path: String,
        first: String,
        second: String,
    },

    #[error("Required field missing: {field}")]
    MissingRequiredField { field: &'static str },

    // ========================================================================
    // Reference Errors
    // ========================================================================
    #[error("Field '{entity}.{field}' references unknown entity '{target}'")]
    UnknownReference {
        entity: String,
        field: String,
        target: String,
    },

    #[error("Entity '{entity}' is owned by '{field}': {reason}")]
    InvalidOwner {
        entity: String,
        field: String,
        reason: String,
    },

    // ========================================================================
    // Feature Flag Constraints
    // ========================================================================
    #[error("Feature '{feature}' requires feature '{requires}' to be enabled")]
    FeatureDependency {
        feature: &'static str,
        requires: &'static str,
    },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidConfig(msg) => vec![
                "Check your project manifest".into(),
                format!("Details: {}", msg),
            ],
            Self::InvalidName {
                kind: "filterable field",
                ..
            } => vec![
                "Rename the field or drop `filterable`".into(),
                "ids, search, page_size, page_number and order_by are built into every filter"
                    .into(),
            ],
            Self::InvalidName {
                kind: "enum value",
                ..
            } => vec![
                "Enum values must start with a letter".into(),
                "Values must stay distinct once converted to PascalCase".into(),
            ],
            Self::InvalidName { kind, .. } => vec![
                format!("A {} name must start with a letter", kind),
                "Use letters, digits, '_' or '-' only".into(),
            ],
            Self::DuplicateEntity { name } => vec![
                format!("Rename or merge the entities named like '{}'", name),
                "Names are compared after snake_case conversion".into(),
            ],
            Self::DuplicateField { entity, field } => vec![format!(
                "Remove the second '{}' field from '{}'",
                field, entity
            )],
            Self::EmptyEnum { .. } => vec!["Add at least one entry to `values`".into()],
            Self::UnknownReference { target, .. } => vec![
                format!("Declare an entity named '{}'", target),
                "Or remove the `references` key from the field".into(),
            ],
            Self::InvalidOwner { .. } => {
                vec!["`owned_by` must name a non-array uuid field of the same entity".into()]
            }
            Self::PathCollision { .. } => vec![
                "Rename the entity so its file does not shadow a shared file".into(),
                "`bus` is reserved while the event bus is enabled".into(),
            ],
            Self::FeatureDependency { requires, .. } => {
                vec![format!("Set `{} = true` under [features]", requires)]
            }
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidConfig(_)
            | Self::InvalidName { .. }
            | Self::DuplicateEntity { .. }
            | Self::DuplicateField { .. }
            | Self::EmptyEnum { .. }
            | Self::MissingRequiredField { .. }
            | Self::PathCollision { .. } => ErrorCategory::Validation,
            Self::UnknownReference { .. } | Self::InvalidOwner { .. } => ErrorCategory::NotFound,
            Self::FeatureDependency { .. } => ErrorCategory::Compatibility,
            Self::AbsolutePathNotAllowed { .. } | Self::PathEscapesRoot { .. } => {
                ErrorCategory::Internal
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Compatibility,
    NotFound,
    Internal,
}
