//! Generation Service - the generator orchestrator.
//!
//! This service coordinates one run:
//! 1. Validate the configuration (nothing is written when this fails)
//! 2. Build the ordered list of generator units from the feature flags
//! 3. For each unit: build the tree, reconcile it against the target file
//!
//! Units run strictly in order and the first failure ends the run. Files
//! written by earlier units stay in place; re-running is safe because every
//! write is idempotent.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::{
    application::{
        ApplicationError,
        ports::Filesystem,
        services::reconciler::{ReconcileOutcome, Reconciler},
    },
    codegen,
    domain::{
        ArtifactKind, ArtifactScope, DomainValidator as validator, Entity, Feature,
        GeneratedArtifact, ProjectConfig, RelativePath,
    },
    error::{StrataError, StrataResult},
};

/// Unit families in orchestration order. Within a family, project-wide
/// artifacts come first, then the per-entity ones, entity by entity.
const FAMILIES: [(Feature, &[ArtifactKind]); 4] = [
    (
        Feature::Base,
        &[
            ArtifactKind::ErrorModule,
            ArtifactKind::ServerBootstrap,
            ArtifactKind::Model,
            ArtifactKind::RepositoryInterface,
            ArtifactKind::RepositoryImpl,
            ArtifactKind::UseCaseInterface,
            ArtifactKind::Interactor,
        ],
    ),
    (
        Feature::Auth,
        &[
            ArtifactKind::AuthModule,
            ArtifactKind::PermissionTable,
            ArtifactKind::Interceptor,
        ],
    ),
    (
        Feature::EventBus,
        &[ArtifactKind::EventBus, ArtifactKind::EntityEvents],
    ),
    (Feature::Tracing, &[ArtifactKind::TracingDecorator]),
];

/// One builder invocation and the file it targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorUnit {
    pub kind: ArtifactKind,
    pub entity: Option<Entity>,
    pub path: RelativePath,
}

impl GeneratorUnit {
    /// Short label used in logs and error messages (`model:Widget`).
    pub fn label(&self) -> String {
        match &self.entity {
            Some(entity) => format!("{}:{}", self.kind, entity.name),
            None => self.kind.to_string(),
        }
    }
}

impl fmt::Display for GeneratorUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.label(), self.path)
    }
}

/// Result of one completed unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactRecord {
    pub unit: String,
    pub kind: ArtifactKind,
    pub path: RelativePath,
    pub outcome: ReconcileOutcome,
}

/// Everything a successful run wrote, in unit order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReport {
    pub root: PathBuf,
    pub records: Vec<ArtifactRecord>,
}

impl GenerationReport {
    pub fn count(&self, outcome: ReconcileOutcome) -> usize {
        self.records.iter().filter(|r| r.outcome == outcome).count()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Observer notified while a run makes progress.
pub trait ProgressObserver {
    /// Called once, after planning, with the number of units.
    fn started(&mut self, _total: usize) {}

    /// Called before a unit runs.
    fn unit_started(&mut self, _index: usize, _unit: &GeneratorUnit) {}

    /// Called after a unit's file was written.
    fn unit_finished(&mut self, _index: usize, _record: &ArtifactRecord) {}
}

/// Observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {}

/// Main generation service.
pub struct GenerationService {
    filesystem: Box<dyn Filesystem>,
}

impl GenerationService {
    /// Create a new generation service writing through `filesystem`.
    pub fn new(filesystem: Box<dyn Filesystem>) -> Self {
        Self { filesystem }
    }

    /// Validate `config` and list the units a run would execute.
    #[instrument(skip_all, fields(module = %config.module()))]
    pub fn plan(&self, config: &ProjectConfig) -> StrataResult<Vec<GeneratorUnit>> {
        validator::validate_project(config).map_err(StrataError::Domain)?;

        let mut units = Vec::new();
        for (feature, kinds) in FAMILIES {
            if !config.is_enabled(feature) {
                continue;
            }
            let enabled: Vec<ArtifactKind> = kinds
                .iter()
                .copied()
                .filter(|k| config.is_enabled(k.feature()))
                .collect();

            for kind in enabled.iter().filter(|k| k.scope() == ArtifactScope::Layout) {
                units.push(GeneratorUnit {
                    kind: *kind,
                    entity: None,
                    path: kind.target_path(config, None)?,
                });
            }
            for entity in config.entities() {
                for kind in enabled.iter().filter(|k| k.scope() == ArtifactScope::Entity) {
                    units.push(GeneratorUnit {
                        kind: *kind,
                        entity: Some(entity.clone()),
                        path: kind.target_path(config, Some(entity))?,
                    });
                }
            }
        }

        debug!(units = units.len(), "Plan built");
        Ok(units)
    }

    /// Run every unit against `root`.
    pub fn run(
        &self,
        config: &ProjectConfig,
        root: impl AsRef<Path>,
    ) -> StrataResult<GenerationReport> {
        self.run_with_progress(config, root, &mut NoProgress)
    }

    /// Run every unit against `root`, reporting progress to `observer`.
    #[instrument(
        skip_all,
        fields(
            run_id = %Uuid::new_v4(),
            module = %config.module(),
            root = %root.as_ref().display()
        )
    )]
    pub fn run_with_progress(
        &self,
        config: &ProjectConfig,
        root: impl AsRef<Path>,
        observer: &mut dyn ProgressObserver,
    ) -> StrataResult<GenerationReport> {
        let root = root.as_ref();
        let units = self.plan(config)?;
        info!(units = units.len(), "Generating project");
        observer.started(units.len());

        let reconciler = Reconciler::new(self.filesystem.as_ref());
        let mut report = GenerationReport {
            root: root.to_path_buf(),
            records: Vec::with_capacity(units.len()),
        };

        for (index, unit) in units.into_iter().enumerate() {
            observer.unit_started(index, &unit);
            let record = self.run_unit(&reconciler, config, root, unit)?;
            observer.unit_finished(index, &record);
            report.records.push(record);
        }

        info!(
            created = report.count(ReconcileOutcome::Created),
            regenerated = report.count(ReconcileOutcome::Regenerated),
            preserved = report.count(ReconcileOutcome::Preserved),
            "Generation completed"
        );
        Ok(report)
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    fn run_unit(
        &self,
        reconciler: &Reconciler<'_>,
        config: &ProjectConfig,
        root: &Path,
        unit: GeneratorUnit,
    ) -> StrataResult<ArtifactRecord> {
        let label = unit.label();
        debug!(unit = %label, path = %unit.path, "Running unit");

        let failed = |reason: String| -> StrataError {
            ApplicationError::GeneratorUnitFailed {
                unit: label.clone(),
                path: unit.path.under(root),
                reason,
            }
            .into()
        };

        let tree = codegen::build(unit.kind, config, unit.entity.as_ref())
            .map_err(|e| failed(e.to_string()))?;
        let artifact = GeneratedArtifact {
            kind: unit.kind,
            path: unit.path.clone(),
            tree,
        };

        let outcome = reconciler.reconcile(root, artifact).map_err(|e| {
            warn!(unit = %label, error = %e, "Unit failed, stopping run");
            failed(e.to_string())
        })?;

        Ok(ArtifactRecord {
            unit: label.clone(),
            kind: unit.kind,
            path: unit.path.clone(),
            outcome,
        })
    }
}
