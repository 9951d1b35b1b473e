//! List command implementation

use crate::cli::commands::open_generator;
use crate::config::ConfigOverrides;
use crate::core::types::RelPath;
use crate::ignore::PathDecision;
use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct ListOutput<'a> {
    files: &'a [RelPath],
    #[serde(skip_serializing_if = "Option::is_none")]
    skipped: Option<Vec<Excluded<'a>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pruned: Option<Vec<Excluded<'a>>>,
}

#[derive(Serialize)]
struct Excluded<'a> {
    path: &'a RelPath,
    #[serde(flatten)]
    decision: &'a PathDecision,
}

fn excluded(entries: &[(RelPath, PathDecision)]) -> Vec<Excluded<'_>> {
    entries
        .iter()
        .map(|(path, decision)| Excluded { path, decision })
        .collect()
}

/// Execute the list command
pub fn execute(root: &Path, config: Option<&Path>, json: bool, all: bool) -> Result<()> {
    let generator = open_generator(root, config, ConfigOverrides::default())?;
    let scan = generator.select()?;

    if json {
        let output = ListOutput {
            files: &scan.files,
            skipped: all.then(|| excluded(&scan.skipped_files)),
            pruned: all.then(|| excluded(&scan.pruned_dirs)),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    for file in &scan.files {
        println!("{}", file);
    }

    if all {
        for (path, decision) in &scan.skipped_files {
            println!("{} {} ({})", "-".dimmed(), path.to_string().dimmed(), decision);
        }
        for (path, decision) in &scan.pruned_dirs {
            println!("{} {}/ ({})", "-".dimmed(), path.to_string().dimmed(), decision);
        }
    }

    Ok(())
}
