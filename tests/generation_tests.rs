//! Document generation tests

use anyhow::Result;
use ctxpack::config::{ConfigOverrides, GeneratorConfig};
use ctxpack::ContextGenerator;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// A small project with docs, code and an ignore file
fn sample_project() -> Result<TempDir> {
    let temp_dir = TempDir::new()?;
    let root = temp_dir.path();

    fs::create_dir_all(root.join("docs/api"))?;
    fs::create_dir_all(root.join("src"))?;
    fs::create_dir_all(root.join("build"))?;

    fs::write(root.join("README.md"), "# Sample\n\nA sample project.\n")?;
    fs::write(root.join("docs/project_issues.md"), "## Issues\n\n* Fix parser\n")?;
    fs::write(root.join("docs/api/index.md"), "# API\n")?;
    fs::write(root.join("src/main.py"), "print('hello')\n")?;
    fs::write(root.join("src/settings.json"), "{\"debug\": true}\n")?;
    fs::write(root.join("build/artifact.bin"), "binary")?;
    fs::write(root.join("debug.log"), "log line")?;
    fs::write(root.join(".gitignore"), "build/\n*.log\n")?;
    fs::write(
        root.join("ctxpack.toml"),
        "project_name = \"Sample\"\ndoc_folders = [\"docs/api\"]\n",
    )?;

    Ok(temp_dir)
}

fn open(root: &Path, overrides: ConfigOverrides) -> Result<ContextGenerator> {
    let mut loaded = GeneratorConfig::load(root, None)?;
    loaded.config.apply(overrides)?;
    Ok(ContextGenerator::new(root, loaded)?)
}

#[test]
fn test_generate_full_document() -> Result<()> {
    let project = sample_project()?;
    let root = project.path();

    let generator = open(root, ConfigOverrides::default())?;
    let report = generator.generate()?;

    let files: Vec<&str> = report.scan.files.iter().map(|f| f.as_str()).collect();
    assert_eq!(files, vec!["src/main.py", "src/settings.json"]);
    assert_eq!(report.output.files.len(), 1);
    assert!(!report.output.truncated);

    let doc = fs::read_to_string(root.join("project_context.md"))?;
    assert!(doc.starts_with("# Project Context for AI Assistant: Sample"));
    assert!(doc.contains("A sample project."));
    assert!(doc.contains("* Fix parser"));
    assert!(doc.contains("No design decisions document found."));
    assert!(doc.contains("### Document: `docs/api/index.md`"));
    assert!(doc.contains("### File: `src/main.py`\n\n```python\nprint('hello')\n```"));
    assert!(doc.contains("### File: `src/settings.json`\n\n```json\n"));
    assert!(!doc.contains("artifact.bin"));
    assert!(!doc.contains("### File: `README.md`"));
    assert!(!doc.contains("### File: `ctxpack.toml`"));

    // Sections appear in order
    let overview = doc.find("A sample project.").unwrap();
    let issues = doc.find("* Fix parser").unwrap();
    let codebase = doc.find("## Current Codebase Files").unwrap();
    let instructions = doc.find("## Instructions for AI Assistant").unwrap();
    assert!(overview < issues && issues < codebase && codebase < instructions);
    Ok(())
}

#[test]
fn test_split_output_parts() -> Result<()> {
    let project = sample_project()?;
    let root = project.path();
    fs::write(root.join("src/big.py"), "x = 1\n".repeat(400))?;

    let generator = open(
        root,
        ConfigOverrides {
            max_output_characters: Some(1000),
            ..Default::default()
        },
    )?;
    let full = generator.render(&generator.select()?.files).to_markdown();
    let report = generator.generate()?;

    assert!(report.output.files.len() > 1);
    assert!(!root.join("project_context.md").exists());

    let mut joined = String::new();
    for (index, path) in report.output.files.iter().enumerate() {
        assert_eq!(
            path.file_name().unwrap().to_string_lossy(),
            format!("project_context_part{}.md", index + 1)
        );
        let part = fs::read_to_string(path)?;
        assert!(part.chars().count() <= 1000);
        joined.push_str(&part);
    }

    // Only the timestamp line may differ between the two renders
    let strip_time = |text: &str| {
        text.lines()
            .filter(|line| !line.starts_with("**Generated On:**"))
            .collect::<Vec<_>>()
            .join("\n")
    };
    assert_eq!(strip_time(&joined), strip_time(&full));

    // A second run does not pick up its own parts
    let again = generator.select()?;
    assert!(again
        .files
        .iter()
        .all(|f| !f.as_str().starts_with("project_context")));
    Ok(())
}

#[test]
fn test_truncated_output() -> Result<()> {
    let project = sample_project()?;
    let root = project.path();
    fs::write(root.join("src/big.py"), "y = 2\n".repeat(400))?;

    let generator = open(
        root,
        ConfigOverrides {
            max_output_characters: Some(800),
            no_split: true,
            ..Default::default()
        },
    )?;
    let report = generator.generate()?;

    assert!(report.output.truncated);
    assert_eq!(report.output.files.len(), 1);
    let doc = fs::read_to_string(root.join("project_context.md"))?;
    assert_eq!(doc.chars().count(), 800);
    assert!(doc.contains("Output truncated"));
    Ok(())
}

#[test]
fn test_empty_project_uses_placeholders() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let root = temp_dir.path();

    let generator = ContextGenerator::open(root, None)?;
    let report = generator.generate()?;

    assert!(report.scan.files.is_empty());
    let doc = fs::read_to_string(root.join("project_context.md"))?;
    assert!(doc.contains("# Project Context for AI Assistant: New Project"));
    assert!(doc.contains("README not found."));
    assert!(doc.contains("No issues document found."));
    assert!(doc.contains("_No files were selected._"));
    Ok(())
}

#[test]
fn test_file_removed_after_selection() -> Result<()> {
    let project = sample_project()?;
    let root = project.path();

    let generator = open(root, ConfigOverrides::default())?;
    let scan = generator.select()?;
    fs::remove_file(root.join("src/settings.json"))?;

    let doc = generator.render(&scan.files).to_markdown();
    assert!(doc.contains("### File: `src/settings.json` - NOT FOUND"));
    assert!(doc.contains("### File: `src/main.py`"));
    Ok(())
}

#[test]
fn test_custom_output_location_is_excluded() -> Result<()> {
    let project = sample_project()?;
    let root = project.path();

    let generator = open(
        root,
        ConfigOverrides {
            output_file: Some("src/context.md".to_string()),
            ..Default::default()
        },
    )?;
    generator.generate()?;
    assert!(root.join("src/context.md").exists());

    let again = generator.select()?;
    assert!(again.files.iter().all(|f| f.as_str() != "src/context.md"));
    Ok(())
}

#[test]
fn test_rerun_replaces_previous_parts() -> Result<()> {
    let project = sample_project()?;
    let root = project.path();
    fs::write(root.join("src/big.py"), "z = 3\n".repeat(800))?;

    let overrides = || ConfigOverrides {
        max_output_characters: Some(1000),
        ..Default::default()
    };
    let first = open(root, overrides())?.generate()?;
    assert!(first.output.files.len() > 2);

    fs::remove_file(root.join("src/big.py"))?;
    let second = open(root, overrides())?.generate()?;
    assert!(second.output.files.len() < first.output.files.len());

    let mut on_disk: Vec<String> = fs::read_dir(root)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| name.starts_with("project_context"))
        .collect();
    on_disk.sort();
    let mut expected: Vec<String> = second
        .output
        .files
        .iter()
        .filter_map(|path| path.file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .collect();
    expected.sort();
    assert_eq!(on_disk, expected);
    Ok(())
}

#[test]
fn test_non_utf8_ignore_file_still_generates() -> Result<()> {
    let project = sample_project()?;
    let root = project.path();
    fs::write(root.join(".gitignore"), b"# caf\xe9\nbuild/\n*.log\n")?;

    let report = ContextGenerator::open(root, None)?.generate()?;

    let files: Vec<&str> = report.scan.files.iter().map(|f| f.as_str()).collect();
    assert_eq!(files, vec!["src/main.py", "src/settings.json"]);
    assert!(root.join("project_context.md").exists());
    Ok(())
}
