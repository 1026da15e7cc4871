//! Exit codes and error messages of the `strata` binary.

use assert_cmd::cargo;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn strata(dir: &TempDir) -> assert_cmd::Command {
    let mut cmd = cargo::cargo_bin_cmd!("strata");
    cmd.current_dir(dir.path()).env("NO_COLOR", "1");
    cmd
}

#[test]
fn test_missing_manifest_exits_3() {
    let temp = TempDir::new().unwrap();

    strata(&temp)
        .arg("generate")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Manifest not found"))
        .stderr(predicate::str::contains("strata init"));
}

#[test]
fn test_feature_dependency_exits_2() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("strata.toml"),
        "module = \"example.com/acme/svc\"\n\n[features]\npermissions = true\n",
    )
    .unwrap();

    strata(&temp)
        .arg("generate")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("auth"));

    assert!(!temp.path().join("cmd").exists());
}

#[test]
fn test_unparseable_manifest_exits_4() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("strata.toml"), "module = \n").unwrap();

    strata(&temp).arg("plan").assert().code(4);
}

#[test]
fn test_unknown_field_type_is_rejected() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("strata.toml"),
        "module = \"example.com/acme/svc\"\n\n[[entities]]\nname = \"Widget\"\n\n\
         [[entities.fields]]\nname = \"size\"\ntype = \"complex128\"\n",
    )
    .unwrap();

    strata(&temp)
        .arg("plan")
        .assert()
        .failure()
        .stderr(predicate::str::contains("complex128"));
}

#[test]
fn test_init_twice_requires_force() {
    let temp = TempDir::new().unwrap();
    strata(&temp).arg("init").assert().success();

    strata(&temp)
        .arg("init")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--force"));

    strata(&temp).args(["init", "--force"]).assert().success();
}

#[test]
fn test_verbose_error_shows_no_hint() {
    let temp = TempDir::new().unwrap();

    strata(&temp)
        .args(["generate", "-v"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Use -v / --verbose").not());
}

#[test]
fn test_unknown_subcommand_exits_2() {
    let mut cmd = cargo::cargo_bin_cmd!("strata");
    cmd.arg("frobnicate").assert().code(2);
}

#[test]
fn test_unknown_config_key_exits_4() {
    let temp = TempDir::new().unwrap();
    strata(&temp)
        .args(["config", "get", "defaults.lang"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Unknown config key"));
}
