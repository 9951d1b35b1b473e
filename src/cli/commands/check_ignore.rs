//! Check-ignore command implementation

use crate::cli::commands::open_generator;
use crate::config::{relative_to_root, ConfigOverrides};
use crate::core::types::RelPath;
use crate::ignore::PathDecision;
use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Serialize)]
struct CheckOutput {
    path: String,
    excluded: bool,
    #[serde(flatten)]
    decision: PathDecision,
}

/// Execute the check-ignore command
pub fn execute(root: &Path, config: Option<&Path>, paths: Vec<PathBuf>, json: bool) -> Result<()> {
    let generator = open_generator(root, config, ConfigOverrides::default())?;
    let mut results = Vec::with_capacity(paths.len());

    for path in paths {
        let rel = if path.is_absolute() {
            relative_to_root(generator.root(), &path)
        } else {
            RelPath::from_path(&path)
        };
        let rel = rel
            .filter(|rel| !rel.is_root())
            .ok_or_else(|| anyhow::anyhow!("Path is not inside the project: {}", path.display()))?;

        let decision = generator.explain(&rel);
        results.push(CheckOutput {
            path: rel.to_string(),
            excluded: decision.is_excluded(),
            decision,
        });
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    for result in &results {
        let marker = if result.excluded {
            "excluded".red()
        } else {
            "included".green()
        };
        println!("{:<9} {}  {}", marker, result.path, result.decision.to_string().dimmed());
    }

    Ok(())
}
