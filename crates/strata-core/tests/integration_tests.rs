//! Integration tests for strata-core.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use strata_core::{
    application::ApplicationError,
    codegen,
    prelude::*,
    source::{self, Declaration},
};

/// Minimal map-backed filesystem; the real adapters live in strata-adapters.
#[derive(Default)]
struct MapFs {
    files: Mutex<BTreeMap<PathBuf, Vec<u8>>>,
}

impl MapFs {
    fn get(&self, path: &str) -> Option<String> {
        let files = self.files.lock().unwrap();
        files
            .get(Path::new(path))
            .map(|b| String::from_utf8(b.clone()).unwrap())
    }

    fn put(&self, path: &str, content: &str) {
        self.files
            .lock()
            .unwrap()
            .insert(PathBuf::from(path), content.as_bytes().to_vec());
    }
}

impl Filesystem for &'static MapFs {
    fn read_file(&self, path: &Path) -> StrataResult<Vec<u8>> {
        self.files
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| {
                ApplicationError::FilesystemError {
                    path: path.to_path_buf(),
                    reason: "not found".into(),
                }
                .into()
            })
    }

    fn write_file(&self, path: &Path, content: &[u8]) -> StrataResult<()> {
        self.files
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), content.to_vec());
        Ok(())
    }

    fn create_dir_all(&self, _path: &Path) -> StrataResult<()> {
        Ok(())
    }
}

fn leaked() -> &'static MapFs {
    Box::leak(Box::<MapFs>::default())
}

fn widget_config(features: FeatureFlags) -> ProjectConfig {
    ProjectConfig::builder()
        .module("acme/svc")
        .features(features)
        .entity(
            Entity::new("Widget")
                .with_field(Field::new("name", FieldType::String))
                .with_field(Field::new("weight", FieldType::Int)),
        )
        .build()
        .unwrap()
}

fn everything() -> FeatureFlags {
    FeatureFlags {
        auth: true,
        permissions: true,
        event_bus: true,
        tracing: true,
    }
}

#[test]
fn widget_scenario() {
    let fs = leaked();
    let service = GenerationService::new(Box::new(fs));
    let config = widget_config(FeatureFlags::default());

    let report = service.run(&config, "out").unwrap();
    assert_eq!(report.count(ReconcileOutcome::Created), report.len());

    let model = fs.get("out/internal/domain/models/widget.go").unwrap();
    assert!(model.starts_with("package models\n"));
    assert!(model.contains("\tName   string   `json:\"name\" db:\"name\"`\n"));
    assert!(model.contains("\tWeight int64    `json:\"weight\" db:\"weight\"`\n"));

    let repo = fs.get("out/internal/domain/repositories/widget.go").unwrap();
    for method in ["Get(", "List(", "Count(", "Create(", "Update(", "Delete("] {
        assert!(repo.contains(&format!("\t{method}ctx context.Context")), "{method}");
    }
}

#[test]
fn second_run_is_byte_identical() {
    let fs = leaked();
    let service = GenerationService::new(Box::new(fs));
    let config = widget_config(everything());

    service.run(&config, "out").unwrap();
    let first = fs.files.lock().unwrap().clone();

    let report = service.run(&config, "out").unwrap();
    assert_eq!(report.count(ReconcileOutcome::Preserved), report.len());
    assert_eq!(*fs.files.lock().unwrap(), first);
}

#[test]
fn hand_edits_survive_and_garbage_is_replaced() {
    let fs = leaked();
    let service = GenerationService::new(Box::new(fs));
    let config = widget_config(FeatureFlags::default());
    service.run(&config, "out").unwrap();

    let path = "out/internal/usecases/widget.go";
    let mut edited = fs.get(path).unwrap();
    edited.push_str("\nfunc helper() int {\n\treturn 42\n}\n");
    fs.put(path, &edited);
    fs.put("out/internal/domain/errs/errors.go", "{{ broken\n");

    let report = service.run(&config, "out").unwrap();
    assert_eq!(fs.get(path).unwrap(), edited);
    assert_eq!(report.count(ReconcileOutcome::Regenerated), 1);
    assert!(fs.get("out/internal/domain/errs/errors.go").unwrap().starts_with("// Package errs"));
}

#[test]
fn license_and_build_constraint_headers_are_preserved() {
    let fs = leaked();
    let service = GenerationService::new(Box::new(fs));
    let config = widget_config(FeatureFlags::default());
    service.run(&config, "out").unwrap();

    let interactor = "out/internal/usecases/widget.go";
    let licensed = format!("// Copyright 2026 Acme Corp.\n\n{}", fs.get(interactor).unwrap());
    fs.put(interactor, &licensed);

    let model = "out/internal/domain/models/widget.go";
    let constrained = format!("//go:build linux\n\n{}", fs.get(model).unwrap());
    fs.put(model, &constrained);

    let report = service.run(&config, "out").unwrap();
    assert_eq!(report.count(ReconcileOutcome::Regenerated), 0);
    assert_eq!(fs.get(interactor).unwrap(), licensed);
    assert_eq!(fs.get(model).unwrap(), constrained);
}

#[test]
fn every_artifact_round_trips_through_the_parser() {
    let config = widget_config(everything());
    let service = GenerationService::new(Box::new(leaked()));

    for unit in service.plan(&config).unwrap() {
        let tree = codegen::build(unit.kind, &config, unit.entity.as_ref()).unwrap();
        let bytes = source::serialize(&tree);
        let parsed = source::parse(&bytes).unwrap_or_else(|| panic!("{unit} did not parse"));

        assert_eq!(source::serialize(&parsed), bytes, "{unit}");
        assert!(
            !parsed.declarations().iter().any(Declaration::is_verbatim),
            "{unit} fell back to verbatim"
        );
    }
}

#[test]
fn auth_flag_adds_exactly_the_auth_paths() {
    let base = leaked();
    GenerationService::new(Box::new(base))
        .run(&widget_config(FeatureFlags::default()), "out")
        .unwrap();

    let auth = leaked();
    GenerationService::new(Box::new(auth))
        .run(
            &widget_config(FeatureFlags {
                auth: true,
                ..FeatureFlags::default()
            }),
            "out",
        )
        .unwrap();

    let base_paths: Vec<_> = base.files.lock().unwrap().keys().cloned().collect();
    let auth_paths: Vec<_> = auth.files.lock().unwrap().keys().cloned().collect();
    let added: Vec<_> = auth_paths
        .iter()
        .filter(|p| !base_paths.contains(p))
        .map(|p| p.to_string_lossy().into_owned())
        .collect();

    assert!(base_paths.iter().all(|p| auth_paths.contains(p)));
    assert_eq!(
        added,
        vec![
            "out/internal/domain/auth/auth.go",
            "out/internal/interceptors/widget.go"
        ]
    );
}
