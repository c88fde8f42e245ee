//! Integration tests for subtree-sync
//!
//! These run the binary against temporary workspaces and inspect the files
//! it writes.

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use regex::Regex;
use std::fs;
use tempfile::TempDir;

/// Helper to create a subtree-sync Command rooted at `dir`
fn sync(dir: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("subtree-sync");
    cmd.current_dir(dir.path())
        .env_remove("SUBTREE_SYNC_MANIFEST")
        .env_remove("RUST_LOG");
    cmd
}

fn write(dir: &TempDir, rel: &str, content: &str) {
    let path = dir.path().join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn read(dir: &TempDir, rel: &str) -> String {
    fs::read_to_string(dir.path().join(rel)).unwrap()
}

const MANIFEST: &str = r#"
subtrees:
  - path: libs/core
    install: true
  - path: tools/lint
  - path: docs
"#;

const CORE_HOOKS: &str = r#"
repos:
  - repo: https://example/black
    rev: "1.0"
    hooks:
      - id: black
        files: \.py$
        args: [--quiet]
  - repo: local
    hooks:
      - id: check
        files: ""
        exclude: |
          (?x) ^ (
            generated/   # codegen
            | vendor/
          )
"#;

const LINT_HOOKS: &str = r#"
repos:
  - repo: https://example/black
    rev: "1.0"
    hooks:
      - id: black
  - repo: local
    hooks:
      - id: check
        language: script
        entry: bin/check.sh
"#;

/// Workspace with two hook-bearing subtrees and one without.
fn create_workspace() -> TempDir {
    let dir = TempDir::new().unwrap();
    write(&dir, "subtrees.yaml", MANIFEST);
    write(&dir, "libs/core/.pre-commit-config.yaml", CORE_HOOKS);
    write(&dir, "tools/lint/.pre-commit-config.yaml", LINT_HOOKS);
    fs::create_dir_all(dir.path().join("docs")).unwrap();
    dir
}

fn merged(dir: &TempDir) -> serde_yaml::Value {
    serde_yaml::from_str(&read(dir, ".pre-commit-config.yaml")).unwrap()
}

// =============================================================================
// Basic CLI Tests
// =============================================================================

mod cli_basics {
    use super::*;

    #[test]
    fn test_help() {
        cargo_bin_cmd!("subtree-sync").arg("--help").assert().success();
    }

    #[test]
    fn test_version() {
        cargo_bin_cmd!("subtree-sync").arg("--version").assert().success();
    }

    #[test]
    fn test_list_shows_subtrees() {
        let dir = create_workspace();
        sync(&dir)
            .arg("list")
            .assert()
            .success()
            .stdout(predicate::str::contains("libs/core"))
            .stdout(predicate::str::contains("libs-core"))
            .stdout(predicate::str::contains("tools/lint"));
    }

    #[test]
    fn test_config_init_then_show() {
        let dir = TempDir::new().unwrap();
        sync(&dir)
            .args(["config", "init"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Created subtree-sync.toml"));
        assert!(dir.path().join("subtree-sync.toml").exists());

        sync(&dir)
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("default_rev = \"main\""));

        sync(&dir)
            .args(["config", "validate"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Configuration is valid."));
    }
}

// =============================================================================
// Pre-commit merge
// =============================================================================

mod precommit {
    use super::*;

    #[test]
    fn test_writes_merged_config_with_header() {
        let dir = create_workspace();
        sync(&dir)
            .arg("precommit")
            .assert()
            .success()
            .stdout(predicate::str::contains("Processing libs/core/.pre-commit-config.yaml"))
            .stdout(predicate::str::contains("Wrote .pre-commit-config.yaml"));

        let content = read(&dir, ".pre-commit-config.yaml");
        let mut lines = content.lines();
        assert_eq!(
            lines.next(),
            Some("# AUTO-GENERATED from subtree pre-commit configs")
        );
        assert!(lines.next().unwrap().starts_with("# Do not edit directly"));
    }

    #[test]
    fn test_merged_layout() {
        let dir = create_workspace();
        sync(&dir).arg("precommit").assert().success();
        let doc = merged(&dir);
        let repos = doc["repos"].as_sequence().unwrap();

        assert_eq!(repos.len(), 3);
        assert_eq!(repos[0]["repo"], "https://example/black");
        assert_eq!(repos[0]["rev"], "1.0");
        assert_eq!(repos[0]["hooks"][0]["id"], "black");
        assert_eq!(repos[0]["hooks"][0]["alias"], "libs/core-black");
        assert_eq!(repos[0]["hooks"][0]["files"], r"^libs/core/(\.py$)");
        assert_eq!(repos[0]["hooks"][0]["args"][0], "--quiet");
        assert_eq!(repos[1]["hooks"][0]["alias"], "tools/lint-black");
        assert_eq!(repos[1]["hooks"][0]["files"], "^tools/lint/");

        let local = &repos[2];
        assert_eq!(local["repo"], "local");
        assert!(local.get("rev").is_none());
        let hooks = local["hooks"].as_sequence().unwrap();
        assert_eq!(hooks[0]["id"], "libs/core-check");
        assert_eq!(hooks[0]["name"], "[libs/core] check");
        assert_eq!(hooks[0]["files"], "^libs/core/");
        assert_eq!(hooks[0]["exclude"], "^libs/core/(generated/|vendor/)");
        assert_eq!(hooks[1]["id"], "tools/lint-check");
        assert_eq!(hooks[1]["entry"], "tools/lint/bin/check.sh");
    }

    #[test]
    fn test_files_patterns_are_anchored_to_subtree() {
        let dir = create_workspace();
        sync(&dir).arg("precommit").assert().success();
        let doc = merged(&dir);

        for repo in doc["repos"].as_sequence().unwrap() {
            for hook in repo["hooks"].as_sequence().unwrap() {
                let files = Regex::new(hook["files"].as_str().unwrap()).unwrap();
                let name = hook["name"].as_str().unwrap();
                let subtree = &name[1..name.find(']').unwrap()];

                assert!(files.is_match(&format!("{subtree}/x.py")), "{name}");
                assert!(!files.is_match("other/x.py"), "{name}");
                assert!(!files.is_match(&format!("prefix/{subtree}/x.py")), "{name}");
            }
        }
    }

    #[test]
    fn test_second_run_is_up_to_date() {
        let dir = create_workspace();
        sync(&dir).arg("precommit").assert().success();
        let first = read(&dir, ".pre-commit-config.yaml");

        sync(&dir)
            .arg("precommit")
            .assert()
            .success()
            .stdout(predicate::str::contains("is up to date"));
        assert_eq!(read(&dir, ".pre-commit-config.yaml"), first);
    }

    #[test]
    fn test_check_mode_detects_drift_without_writing() {
        let dir = create_workspace();
        sync(&dir)
            .args(["--check", "precommit"])
            .assert()
            .failure()
            .stdout(predicate::str::contains("out of date"));
        assert!(!dir.path().join(".pre-commit-config.yaml").exists());

        sync(&dir).arg("precommit").assert().success();
        sync(&dir).args(["--check", "precommit"]).assert().success();
    }

    #[test]
    fn test_missing_manifest_is_not_an_error() {
        let dir = TempDir::new().unwrap();
        sync(&dir)
            .arg("precommit")
            .assert()
            .success()
            .stdout(predicate::str::contains("No subtrees.yaml found"));
        assert!(!dir.path().join(".pre-commit-config.yaml").exists());
    }

    #[test]
    fn test_empty_manifest_is_not_an_error() {
        let dir = TempDir::new().unwrap();
        write(&dir, "subtrees.yaml", "subtrees: []\n");
        sync(&dir)
            .arg("precommit")
            .assert()
            .success()
            .stdout(predicate::str::contains("No subtrees configured"));
    }

    #[test]
    fn test_no_subtree_configs_writes_nothing() {
        let dir = TempDir::new().unwrap();
        write(&dir, "subtrees.yaml", "subtrees:\n  - path: a\n");
        sync(&dir)
            .arg("precommit")
            .assert()
            .success()
            .stdout(predicate::str::contains("No pre-commit configs found in subtrees"));
        assert!(!dir.path().join(".pre-commit-config.yaml").exists());
    }

    #[test]
    fn test_malformed_hook_fails_without_output() {
        let dir = create_workspace();
        write(
            &dir,
            "tools/lint/.pre-commit-config.yaml",
            "repos:\n  - repo: local\n    hooks:\n      - name: missing id\n",
        );
        sync(&dir)
            .arg("precommit")
            .assert()
            .failure()
            .stderr(predicate::str::contains("tools/lint"));
        assert!(!dir.path().join(".pre-commit-config.yaml").exists());
    }

    #[test]
    fn test_manifest_flag_overrides_default() {
        let dir = create_workspace();
        fs::rename(
            dir.path().join("subtrees.yaml"),
            dir.path().join("vendored.yaml"),
        )
        .unwrap();
        sync(&dir)
            .args(["--manifest", "vendored.yaml", "precommit"])
            .assert()
            .success();
        assert!(dir.path().join(".pre-commit-config.yaml").exists());
    }

    #[test]
    fn test_manifest_env_overrides_config_file() {
        let dir = create_workspace();
        fs::rename(
            dir.path().join("subtrees.yaml"),
            dir.path().join("vendored.yaml"),
        )
        .unwrap();
        write(&dir, "subtree-sync.toml", "[paths]\nmanifest = \"missing.yaml\"\n");
        sync(&dir)
            .env("SUBTREE_SYNC_MANIFEST", "vendored.yaml")
            .arg("precommit")
            .assert()
            .success();
        assert!(dir.path().join(".pre-commit-config.yaml").exists());
    }
}

// =============================================================================
// Pyproject reconciliation
// =============================================================================

mod pyproject {
    use super::*;

    const PYPROJECT: &str = r#"# Workspace manifest
[project]
name = "mono"
version = "2.0.0"
dependencies = [
    "requests",
]

[tool.ruff]
line-length = 100  # keep in sync with black
"#;

    fn toml_doc(dir: &TempDir) -> toml::Table {
        toml::from_str(&read(dir, "pyproject.toml")).unwrap()
    }

    #[test]
    fn test_creates_pyproject_when_missing() {
        let dir = create_workspace();
        sync(&dir)
            .arg("pyproject")
            .assert()
            .success()
            .stdout(predicate::str::contains("with 1 installable package(s)"));

        let doc = toml_doc(&dir);
        assert_eq!(doc["project"]["name"].as_str(), Some("workspace"));
        assert_eq!(
            doc["project"]["dependencies"].as_array().unwrap()[0].as_str(),
            Some("libs-core")
        );
        let source = &doc["tool"]["uv"]["sources"]["libs-core"];
        assert_eq!(source["path"].as_str(), Some("./libs/core"));
        assert_eq!(source["editable"].as_bool(), Some(true));
    }

    #[test]
    fn test_preserves_unowned_content() {
        let dir = create_workspace();
        write(&dir, "pyproject.toml", PYPROJECT);
        sync(&dir).arg("pyproject").assert().success();

        let content = read(&dir, "pyproject.toml");
        assert!(content.starts_with("# Workspace manifest\n[project]\nname = \"mono\"\n"));
        assert!(content.contains("line-length = 100  # keep in sync with black"));
        assert!(content.contains("    \"requests\",\n    \"libs-core\",\n"));
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let dir = create_workspace();
        write(&dir, "pyproject.toml", PYPROJECT);
        sync(&dir).arg("pyproject").assert().success();
        let first = read(&dir, "pyproject.toml");

        sync(&dir).arg("pyproject").assert().success();
        assert_eq!(read(&dir, "pyproject.toml"), first);
        sync(&dir).args(["--check", "pyproject"]).assert().success();
    }

    #[test]
    fn test_no_installable_subtrees() {
        let dir = TempDir::new().unwrap();
        write(&dir, "subtrees.yaml", "subtrees:\n  - path: a\n");
        sync(&dir)
            .arg("pyproject")
            .assert()
            .success()
            .stdout(predicate::str::contains("No installable subtrees found"));
        assert!(!dir.path().join("pyproject.toml").exists());
    }

    #[test]
    fn test_package_name_collision_fails() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "subtrees.yaml",
            "subtrees:\n  - path: pkg_a\n    install: true\n  - path: pkg/a\n    install: true\n",
        );
        sync(&dir)
            .arg("pyproject")
            .assert()
            .failure()
            .stderr(predicate::str::contains("pkg-a"));
        assert!(!dir.path().join("pyproject.toml").exists());
    }

    #[test]
    fn test_custom_package_manager_from_config_file() {
        let dir = create_workspace();
        write(&dir, "subtree-sync.toml", "[pyproject]\npackage_manager = \"pdm\"\n");
        sync(&dir).arg("pyproject").assert().success();

        let doc = toml_doc(&dir);
        assert!(doc["tool"]["pdm"]["sources"].get("libs-core").is_some());
    }
}

// =============================================================================
// Both at once
// =============================================================================

#[test]
fn test_all_runs_both_syncs() {
    let dir = create_workspace();
    sync(&dir).arg("all").assert().success();
    assert!(dir.path().join(".pre-commit-config.yaml").exists());
    assert!(dir.path().join("pyproject.toml").exists());

    sync(&dir).args(["--check", "all"]).assert().success();
}
