//! Command-line behaviour tests

use anyhow::Result;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn project() -> Result<TempDir> {
    let temp_dir = TempDir::new()?;
    let root = temp_dir.path();
    fs::create_dir_all(root.join("src"))?;
    fs::create_dir_all(root.join("dist"))?;
    fs::write(root.join("README.md"), "# Cli Project\n")?;
    fs::write(root.join("src/app.py"), "print('app')\n")?;
    fs::write(root.join("dist/bundle.js"), "bundle")?;
    fs::write(root.join(".gitignore"), "dist/\n")?;
    Ok(temp_dir)
}

fn ctxpack(root: &std::path::Path) -> Result<Command> {
    let mut cmd = Command::cargo_bin("ctxpack")?;
    cmd.arg("--root").arg(root);
    Ok(cmd)
}

#[test]
fn test_list_prints_selected_files() -> Result<()> {
    let project = project()?;

    ctxpack(project.path())?
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("src/app.py"))
        .stdout(predicate::str::contains("dist").not())
        .stdout(predicate::str::contains("README.md").not());
    Ok(())
}

#[test]
fn test_list_json_with_pruned_directories() -> Result<()> {
    let project = project()?;

    let output = ctxpack(project.path())?
        .args(["list", "--json", "--all"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let value: serde_json::Value = serde_json::from_slice(&output)?;
    assert_eq!(value["files"], serde_json::json!(["src/app.py"]));
    let pruned = value["pruned"].as_array().unwrap();
    assert_eq!(pruned.len(), 1);
    assert_eq!(pruned[0]["path"], "dist");
    assert_eq!(pruned[0]["decision"], "ignored");
    assert_eq!(pruned[0]["rule"], "dist/");
    Ok(())
}

#[test]
fn test_check_ignore_explains_decisions() -> Result<()> {
    let project = project()?;

    ctxpack(project.path())?
        .args(["check-ignore", "src/app.py", "dist/bundle.js"])
        .assert()
        .success()
        .stdout(predicate::str::contains("included"))
        .stdout(predicate::str::contains("excluded"));

    let output = ctxpack(project.path())?
        .args(["check-ignore", "--json", "dist/bundle.js"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let value: serde_json::Value = serde_json::from_slice(&output)?;
    assert_eq!(value[0]["path"], "dist/bundle.js");
    assert_eq!(value[0]["excluded"], true);
    assert_eq!(value[0]["decision"], "inside_pruned");
    Ok(())
}

#[test]
fn test_check_ignore_rejects_outside_paths() -> Result<()> {
    let project = project()?;

    ctxpack(project.path())?
        .args(["check-ignore", "../elsewhere.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not inside the project"));
    Ok(())
}

#[test]
fn test_generate_writes_document() -> Result<()> {
    let project = project()?;

    ctxpack(project.path())?
        .args(["generate", "--name", "Cli Project"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Generated context for 'Cli Project'"));

    let doc = fs::read_to_string(project.path().join("project_context.md"))?;
    assert!(doc.starts_with("# Project Context for AI Assistant: Cli Project"));
    assert!(doc.contains("### File: `src/app.py`"));
    assert!(!doc.contains("bundle.js"));
    Ok(())
}

#[test]
fn test_generate_is_default_command() -> Result<()> {
    let project = project()?;

    ctxpack(project.path())?.arg("--quiet").assert().success().stdout("");

    assert!(project.path().join("project_context.md").exists());
    Ok(())
}

#[test]
fn test_dry_run_writes_nothing() -> Result<()> {
    let project = project()?;

    ctxpack(project.path())?
        .args(["generate", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dry run"))
        .stdout(predicate::str::contains("Files selected: 1"));

    assert!(!project.path().join("project_context.md").exists());
    Ok(())
}

#[test]
fn test_init_refuses_to_overwrite() -> Result<()> {
    let project = project()?;
    let config = project.path().join("ctxpack.toml");

    ctxpack(project.path())?.arg("init").assert().success();
    let written = fs::read_to_string(&config)?;
    assert!(written.contains("project_name = \"New Project\""));

    ctxpack(project.path())?
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Refusing to overwrite"));

    ctxpack(project.path())?.args(["init", "--force"]).assert().success();
    Ok(())
}

#[test]
fn test_missing_root_fails() -> Result<()> {
    let temp_dir = TempDir::new()?;

    ctxpack(&temp_dir.path().join("missing"))?
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Project root not found"));
    Ok(())
}
