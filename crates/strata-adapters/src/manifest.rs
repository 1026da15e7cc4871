//! Project manifest loader.
//!
//! Reads a `strata.toml` (or `*.json`) description of the service to
//! generate and turns it into a validated [`ProjectConfig`].
//!
//! # `strata.toml` format
//!
//! ```toml
//! module = "acme/svc"        # root import path of the generated module
//! name   = "svc"             # optional; defaults to the last module segment
//!
//! [features]                 # every flag defaults to false
//! auth        = true
//! permissions = true         # requires auth
//! event_bus   = true
//! tracing     = true
//!
//! [[entities]]
//! name     = "Document"
//! owned_by = "author_id"     # optional; a uuid field
//!
//! [[entities.fields]]
//! name       = "title"
//! type       = "string"      # string | int | bool | float | timestamp | uuid | enum | []<type>
//! searchable = true
//!
//! [[entities.fields]]
//! name   = "status"
//! type   = "enum"
//! values = ["draft", "published"]
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, instrument};

use strata_core::{
    domain::{DomainError, Entity, FeatureFlags, Field, FieldType, ProjectConfig},
    error::StrataError,
};

/// Default manifest file name.
pub const MANIFEST_FILE: &str = "strata.toml";

/// Manifest written by `strata init`.
pub const STARTER_MANIFEST: &str = r#"# Strata project manifest.
module = "example.com/acme/svc"

[features]
auth = false
permissions = false
event_bus = false
tracing = false

[[entities]]
name = "Widget"

[[entities.fields]]
name = "name"
type = "string"
filterable = true
searchable = true

[[entities.fields]]
name = "weight"
type = "int"
"#;

/// Errors raised while loading a manifest.
#[derive(Debug, Error, Clone)]
pub enum ManifestError {
    #[error("Manifest not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Failed to read manifest {path}: {reason}")]
    Read { path: PathBuf, reason: String },

    #[error("Failed to parse manifest {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    /// The manifest parsed but describes an invalid project.
    #[error(transparent)]
    Invalid(#[from] DomainError),
}

impl From<ManifestError> for StrataError {
    fn from(err: ManifestError) -> Self {
        match err {
            ManifestError::Invalid(domain) => StrataError::Domain(domain),
            other => StrataError::Configuration {
                message: other.to_string(),
            },
        }
    }
}

/// Manifest file format, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestFormat {
    Toml,
    Json,
}

impl ManifestFormat {
    /// `.json` is JSON; everything else is TOML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Toml,
        }
    }
}

/// Deserialized manifest, before domain validation.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ProjectManifest {
    pub module: String,
    pub name: Option<String>,
    #[serde(default)]
    pub features: FeatureFlags,
    #[serde(default)]
    pub entities: Vec<EntityEntry>,
}

/// One entry under `[[entities]]`.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct EntityEntry {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldEntry>,
    pub owned_by: Option<String>,
}

/// One entry under `[[entities.fields]]`.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FieldEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    /// Enum members; required when `type = "enum"`.
    #[serde(default)]
    pub values: Vec<String>,
    #[serde(default)]
    pub nullable: bool,
    #[serde(default)]
    pub filterable: bool,
    #[serde(default)]
    pub searchable: bool,
    pub references: Option<String>,
}

impl ProjectManifest {
    /// Parse manifest text in the given format.
    pub fn parse(raw: &str, format: ManifestFormat) -> Result<Self, String> {
        match format {
            ManifestFormat::Toml => toml::from_str(raw).map_err(|e| e.to_string()),
            ManifestFormat::Json => serde_json::from_str(raw).map_err(|e| e.to_string()),
        }
    }

    /// Build and validate the project configuration.
    pub fn into_config(self) -> Result<ProjectConfig, DomainError> {
        let mut builder = ProjectConfig::builder()
            .module(self.module)
            .features(self.features);
        if let Some(name) = self.name {
            builder = builder.name(name);
        }

        for entry in self.entities {
            builder = builder.entity(entry.into_entity()?);
        }
        builder.build()
    }
}

impl EntityEntry {
    fn into_entity(self) -> Result<Entity, DomainError> {
        let mut entity = Entity::new(self.name);
        for field in self.fields {
            entity = entity.with_field(field.into_field()?);
        }
        if let Some(owner) = self.owned_by {
            entity = entity.owned_by(owner);
        }
        Ok(entity)
    }
}

impl FieldEntry {
    fn into_field(self) -> Result<Field, DomainError> {
        let field_type = FieldType::parse_with_values(&self.field_type, &self.values)?;
        let mut field = Field::new(self.name, field_type);
        if self.nullable {
            field = field.nullable();
        }
        if self.filterable {
            field = field.filterable();
        }
        if self.searchable {
            field = field.searchable();
        }
        if let Some(target) = self.references {
            field = field.references(target);
        }
        Ok(field)
    }
}

/// Load and validate the manifest at `path`.
#[instrument(fields(path = %path.display()))]
pub fn load(path: &Path) -> Result<ProjectConfig, ManifestError> {
    if !path.exists() {
        return Err(ManifestError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let raw = fs::read_to_string(path).map_err(|e| ManifestError::Read {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let format = ManifestFormat::from_path(path);
    let manifest = ProjectManifest::parse(&raw, format).map_err(|reason| ManifestError::Parse {
        path: path.to_path_buf(),
        reason,
    })?;

    let config = manifest.into_config()?;
    debug!(
        module = %config.module(),
        entities = config.entities().len(),
        ?format,
        "Manifest loaded"
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use strata_core::domain::Feature;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        File::create(&path)
            .unwrap()
            .write_all(content.as_bytes())
            .unwrap();
        path
    }

    #[test]
    fn starter_manifest_loads() {
        let temp = TempDir::new().unwrap();
        let config = load(&write(&temp, MANIFEST_FILE, STARTER_MANIFEST)).unwrap();

        assert_eq!(config.module(), "example.com/acme/svc");
        assert_eq!(config.name(), "svc");
        assert_eq!(config.entities()[0].fields.len(), 2);
        assert!(!config.is_enabled(Feature::Auth));
    }

    #[test]
    fn toml_with_every_field_kind() {
        let raw = r#"
module = "acme/svc"
name = "api"

[features]
auth = true
permissions = true

[[entities]]
name = "User"

[[entities]]
name = "Document"
owned_by = "author_id"

[[entities.fields]]
name = "status"
type = "enum"
values = ["draft", "published"]
filterable = true

[[entities.fields]]
name = "tags"
type = "[]string"

[[entities.fields]]
name = "author_id"
type = "uuid"
references = "User"

[[entities.fields]]
name = "published_at"
type = "timestamp"
nullable = true
"#;
        let config = ProjectManifest::parse(raw, ManifestFormat::Toml)
            .unwrap()
            .into_config()
            .unwrap();

        assert_eq!(config.name(), "api");
        assert!(config.is_enabled(Feature::Permissions));
        let document = &config.entities()[1];
        assert_eq!(
            document.field("status").unwrap().field_type,
            FieldType::Enum(vec!["draft".into(), "published".into()])
        );
        assert!(document.field("tags").unwrap().field_type.is_array());
        assert_eq!(document.owner_field().unwrap().name, "author_id");
        assert!(document.field("published_at").unwrap().nullable);
    }

    #[test]
    fn json_by_extension() {
        let temp = TempDir::new().unwrap();
        let path = write(
            &temp,
            "strata.json",
            r#"{"module": "acme/svc", "entities": [{"name": "Widget", "fields": [{"name": "name", "type": "string"}]}]}"#,
        );
        assert_eq!(ManifestFormat::from_path(&path), ManifestFormat::Json);
        assert_eq!(load(&path).unwrap().entities()[0].name, "Widget");
    }

    #[test]
    fn missing_file() {
        let err = load(Path::new("/absolutely/does/not/exist.toml")).unwrap_err();
        assert!(matches!(err, ManifestError::NotFound { .. }));
        assert!(matches!(
            StrataError::from(err),
            StrataError::Configuration { .. }
        ));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = ProjectManifest::parse("module = \"a/b\"\ncolour = 1\n", ManifestFormat::Toml)
            .unwrap_err();
        assert!(err.contains("colour"));
    }

    #[test]
    fn domain_errors_stay_domain_errors() {
        let temp = TempDir::new().unwrap();
        let path = write(
            &temp,
            MANIFEST_FILE,
            "module = \"acme/svc\"\n[features]\npermissions = true\n",
        );
        let err = load(&path).unwrap_err();
        assert!(matches!(err, ManifestError::Invalid(_)));
        assert!(matches!(StrataError::from(err), StrataError::Domain(_)));
    }
}
