//! Domain value objects: FieldType, Feature, FeatureFlags.
//!
//! # Design
//!
//! These are pure value types with equality-by-value and no identity. This
//! file defines the types, their string representations, and their `FromStr`
//! parsers. How a field type maps onto Go lives in `codegen::types`.
//!
//! # Adding a Field Type
//!
//! 1. Add the enum variant here
//! 2. Add the `Display` arm and the `FromStr` arm here
//! 3. Add the Go mapping in `codegen::types`

use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── FieldType ─────────────────────────────────────────────────────────────────

/// Semantic type of an entity field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Int,
    Bool,
    Float,
    Timestamp,
    Uuid,
    /// Closed set of string values; rendered as a named Go string type.
    Enum(Vec<String>),
    /// Homogeneous list, spelled `[]<inner>` in manifests.
    Array(Box<FieldType>),
}

impl FieldType {
    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array(_))
    }

    pub fn is_uuid(&self) -> bool {
        matches!(self, Self::Uuid)
    }

    /// Innermost element type (`[][]int` → `int`).
    pub fn element(&self) -> &FieldType {
        match self {
            Self::Array(inner) => inner.element(),
            other => other,
        }
    }

    /// Parse a type spelling, attaching enum values when the base is `enum`.
    ///
    /// `values` is ignored for non-enum types.
    pub fn parse_with_values(spelling: &str, values: &[String]) -> Result<Self, DomainError> {
        let spelling = spelling.trim();
        if let Some(inner) = spelling.strip_prefix("[]") {
            return Ok(Self::Array(Box::new(Self::parse_with_values(inner, values)?)));
        }
        match spelling.to_ascii_lowercase().as_str() {
            "enum" => Ok(Self::Enum(values.to_vec())),
            _ => spelling.parse(),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => f.write_str("string"),
            Self::Int => f.write_str("int"),
            Self::Bool => f.write_str("bool"),
            Self::Float => f.write_str("float"),
            Self::Timestamp => f.write_str("timestamp"),
            Self::Uuid => f.write_str("uuid"),
            Self::Enum(_) => f.write_str("enum"),
            Self::Array(inner) => write!(f, "[]{inner}"),
        }
    }
}

impl FromStr for FieldType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(inner) = s.trim().strip_prefix("[]") {
            return Ok(Self::Array(Box::new(inner.parse()?)));
        }
        match s.trim().to_ascii_lowercase().as_str() {
            "string" | "str" | "text" => Ok(Self::String),
            "int" | "integer" => Ok(Self::Int),
            "bool" | "boolean" => Ok(Self::Bool),
            "float" | "double" | "decimal" => Ok(Self::Float),
            "timestamp" | "time" | "datetime" => Ok(Self::Timestamp),
            "uuid" => Ok(Self::Uuid),
            "enum" => Ok(Self::Enum(Vec::new())),
            other => Err(DomainError::InvalidConfig(format!(
                "unknown field type: {other}"
            ))),
        }
    }
}

// ── Feature ───────────────────────────────────────────────────────────────────

/// A family of generator units. `Base` always runs; the others are gated by
/// the matching flag on [`FeatureFlags`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Feature {
    Base,
    Auth,
    Permissions,
    EventBus,
    Tracing,
}

impl Feature {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Base => "base",
            Self::Auth => "auth",
            Self::Permissions => "permissions",
            Self::EventBus => "event-bus",
            Self::Tracing => "tracing",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Feature {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "base" => Ok(Self::Base),
            "auth" | "authentication" => Ok(Self::Auth),
            "permissions" | "perms" => Ok(Self::Permissions),
            "event-bus" | "eventbus" | "events" => Ok(Self::EventBus),
            "tracing" | "trace" => Ok(Self::Tracing),
            other => Err(DomainError::InvalidConfig(format!("unknown feature: {other}"))),
        }
    }
}

// ── FeatureFlags ──────────────────────────────────────────────────────────────

/// Boolean toggles selecting which generator families run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureFlags {
    pub auth: bool,
    pub permissions: bool,
    pub event_bus: bool,
    pub tracing: bool,
}

impl FeatureFlags {
    /// Whether the family is enabled. `Base` is always on.
    pub const fn is_enabled(&self, feature: Feature) -> bool {
        match feature {
            Feature::Base => true,
            Feature::Auth => self.auth,
            Feature::Permissions => self.auth && self.permissions,
            Feature::EventBus => self.event_bus,
            Feature::Tracing => self.tracing,
        }
    }

    /// Enabled families, in orchestration order.
    pub fn enabled(&self) -> Vec<Feature> {
        [
            Feature::Base,
            Feature::Auth,
            Feature::Permissions,
            Feature::EventBus,
            Feature::Tracing,
        ]
        .into_iter()
        .filter(|f| self.is_enabled(*f))
        .collect()
    }

    /// Cross-flag constraints.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.permissions && !self.auth {
            return Err(DomainError::FeatureDependency {
                feature: "permissions",
                requires: "auth",
            });
        }
        Ok(())
    }
}
