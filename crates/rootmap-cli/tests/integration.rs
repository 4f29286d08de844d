//! Integration tests for the rootmap CLI

use assert_cmd::{cargo::cargo_bin_cmd, Command};
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Command reading a copy of the fixture config placed in `temp_dir`, so the
/// log file lands there too
fn rootmap_cmd(temp_dir: &TempDir) -> Command {
    let config = temp_dir.path().join("rootmap.toml");
    assert!(fs::copy(fixture("rootmap.toml"), &config).is_ok());
    rootmap_cmd_with_config(&config)
}

fn rootmap_cmd_with_config(config: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("rootmap");
    cmd.env("ROOTMAP_CONFIG", config);
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_version() {
    let Ok(temp_dir) = TempDir::new() else {
        return;
    };
    rootmap_cmd(&temp_dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("rootmap"));
}

#[test]
fn test_help() {
    let Ok(temp_dir) = TempDir::new() else {
        return;
    };
    rootmap_cmd(&temp_dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("package trees"));
}

#[test]
fn test_invalid_command() {
    let Ok(temp_dir) = TempDir::new() else {
        return;
    };
    rootmap_cmd(&temp_dir).arg("invalid").assert().failure();
}

#[test]
fn test_parse_lists_records_and_skips() {
    let Ok(temp_dir) = TempDir::new() else {
        return;
    };
    rootmap_cmd(&temp_dir)
        .arg("parse")
        .arg(fixture("sample.rootmap"))
        .assert()
        .success()
        .stdout(predicate::str::contains("libpkg.so"))
        .stdout(predicate::str::contains("Foo::Bar"))
        .stdout(predicate::str::contains("NS::count"))
        .stdout(predicate::str::contains("unknown keyword 'frobnicate'"))
        .stdout(predicate::str::contains("header reference"));
}

#[test]
fn test_parse_filters_template_arguments() {
    let Ok(temp_dir) = TempDir::new() else {
        return;
    };
    rootmap_cmd(&temp_dir)
        .args(["parse", "--kind", "class"])
        .arg(fixture("sample.rootmap"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Holder"))
        .stdout(predicate::str::contains("Bar"))
        .stdout(predicate::str::contains("int").not());
}

#[test]
fn test_parse_json() {
    let Ok(temp_dir) = TempDir::new() else {
        return;
    };
    let output = rootmap_cmd(&temp_dir)
        .args(["parse", "--json"])
        .arg(fixture("sample.rootmap"))
        .output();
    assert!(output.is_ok());
    let output = output.unwrap_or_else(|_| unreachable!());
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap_or_default();
    assert_eq!(value["libraries"][0], "libpkg.so");
    assert!(value["records"]
        .as_array()
        .is_some_and(|records| records.iter().any(|r| r["path"] == "NS::count")));
    assert!(value["skipped"]
        .as_array()
        .is_some_and(|skipped| skipped.iter().any(|s| s["reason"] == "unknown_keyword")));
}

#[test]
fn test_parse_missing_file() {
    let Ok(temp_dir) = TempDir::new() else {
        return;
    };
    rootmap_cmd(&temp_dir)
        .args(["parse", "/nonexistent/missing.rootmap"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing.rootmap"));
}

#[test]
fn test_tree_uses_configured_package() {
    let Ok(temp_dir) = TempDir::new() else {
        return;
    };
    rootmap_cmd(&temp_dir)
        .arg("tree")
        .arg(fixture("sample.rootmap"))
        .assert()
        .success()
        .stdout(predicate::str::contains("  Foo  class  [pkg]"))
        .stdout(predicate::str::contains("    Bar  class  [pkg.Foo]"))
        .stdout(predicate::str::contains("  NS  namespace  [pkg]"))
        .stdout(predicate::str::contains("    count  variable  [pkg.NS]"))
        .stdout(predicate::str::contains("    Index  typedef  [pkg.NS]"));
}

#[test]
fn test_tree_package_override_json() {
    let Ok(temp_dir) = TempDir::new() else {
        return;
    };
    let output = rootmap_cmd(&temp_dir)
        .args(["tree", "--json", "--package", "shapes"])
        .arg(fixture("sample.rootmap"))
        .output();
    assert!(output.is_ok());
    let output = output.unwrap_or_else(|_| unreachable!());
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap_or_default();
    assert_eq!(value["package"], "shapes");
    assert!(value["nodes"]
        .as_array()
        .is_some_and(|nodes| nodes.iter().any(|n| n["path"] == "Foo.Bar" && n["module"] == "shapes.Foo")));
    assert_eq!(value["report"]["skipped"].as_array().map(Vec::len), Some(0));
}

#[test]
fn test_paths_missing_directory() {
    let Ok(temp_dir) = TempDir::new() else {
        return;
    };
    rootmap_cmd(&temp_dir)
        .args(["paths", "/nonexistent/rootmap_pkg", "geom"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Package directory not found"));
}

#[test]
fn test_paths_unchecked() {
    let Ok(temp_dir) = TempDir::new() else {
        return;
    };
    rootmap_cmd(&temp_dir)
        .args(["paths", "--unchecked", "/opt/bindings", "geom"])
        .assert()
        .success()
        .stdout(predicate::str::contains("geom.rootmap"));
}

#[test]
fn test_load_missing_library() {
    let Ok(temp_dir) = TempDir::new() else {
        return;
    };
    rootmap_cmd(&temp_dir)
        .arg("load")
        .arg(temp_dir.path())
        .arg("geom")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Compiled library not found"));
}

#[test]
fn test_config_show() {
    let Ok(temp_dir) = TempDir::new() else {
        return;
    };
    rootmap_cmd(&temp_dir)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration:"))
        .stdout(predicate::str::contains("cppyy.gbl"));
}

#[test]
fn test_config_set_and_path() {
    let Ok(temp_dir) = TempDir::new() else {
        return;
    };
    let config = temp_dir.path().join("rootmap.toml");

    rootmap_cmd_with_config(&config)
        .args(["config", "set", "umbrella-module", "bindings.gbl"])
        .assert()
        .success();
    let content = fs::read_to_string(&config).unwrap_or_default();
    assert!(content.contains("bindings.gbl"));

    rootmap_cmd_with_config(&config)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("rootmap.toml"));

    rootmap_cmd_with_config(&config)
        .args(["config", "set", "venv-path", "/tmp"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown config key"));
}

#[test]
fn test_config_get() {
    let Ok(temp_dir) = TempDir::new() else {
        return;
    };
    rootmap_cmd(&temp_dir)
        .args(["config", "get", "umbrella-module"])
        .assert()
        .success()
        .stdout(predicate::str::diff("cppyy.gbl\n"));

    rootmap_cmd(&temp_dir)
        .args(["config", "get", "library-prefix"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("library-prefix"));
}

#[test]
fn test_paths_accepts_library_file_name() {
    let Ok(temp_dir) = TempDir::new() else {
        return;
    };
    rootmap_cmd(&temp_dir)
        .args(["paths", "--unchecked", "/opt/bindings"])
        .arg(format!(
            "{}geom{}",
            std::env::consts::DLL_PREFIX,
            std::env::consts::DLL_SUFFIX
        ))
        .assert()
        .success()
        .stdout(predicate::str::contains(
            Path::new("/opt/bindings")
                .join("geom.rootmap")
                .display()
                .to_string(),
        ));
}

#[test]
fn test_log_file_follows_config_location() {
    let Ok(temp_dir) = TempDir::new() else {
        return;
    };
    let config_dir = temp_dir.path().join("isolated");
    assert!(fs::create_dir_all(&config_dir).is_ok());
    let config = config_dir.join("rootmap.toml");

    rootmap_cmd_with_config(&config)
        .args(["parse", "/nonexistent/missing.rootmap"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            config_dir.join("rootmap.log").display().to_string(),
        ));

    let log = fs::read_to_string(config_dir.join("rootmap.log")).unwrap_or_default();
    assert!(log.contains("ERROR"));
    assert!(log.contains("missing.rootmap"));
}
