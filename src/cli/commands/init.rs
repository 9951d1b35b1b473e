//! Init command implementation

use crate::cli::commands::resolve_root;
use crate::config::{GeneratorConfig, CONFIG_FILE_NAME};
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;

/// Execute the init command
pub fn execute(root: &Path, config: Option<&Path>, force: bool, quiet: bool) -> Result<()> {
    let root = resolve_root(root)?;
    let path = match config {
        Some(path) if path.is_absolute() => path.to_path_buf(),
        Some(path) => root.join(path),
        None => root.join(CONFIG_FILE_NAME),
    };

    GeneratorConfig::default()
        .save(&path, force)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    if !quiet {
        println!(
            "{} Wrote default configuration to {}",
            "✓".green().bold(),
            path.display().to_string().cyan()
        );
    }
    Ok(())
}
