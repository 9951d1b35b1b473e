//! CLI command implementations

pub mod check_ignore;
pub mod generate;
pub mod init;
pub mod list;

// Common utilities for commands
use crate::config::{ConfigOverrides, GeneratorConfig};
use crate::generator::ContextGenerator;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Canonical project root, checked to be a directory
pub fn resolve_root(root: &Path) -> Result<PathBuf> {
    let resolved = dunce::canonicalize(root)
        .with_context(|| format!("Project root not found: {}", root.display()))?;
    if !resolved.is_dir() {
        anyhow::bail!("Project root is not a directory: {}", resolved.display());
    }
    Ok(resolved)
}

/// Load configuration, apply overrides and prepare a run
pub fn open_generator(
    root: &Path,
    config: Option<&Path>,
    overrides: ConfigOverrides,
) -> Result<ContextGenerator> {
    let root = resolve_root(root)?;
    let mut loaded = GeneratorConfig::load(&root, config)?;
    loaded.config.apply(overrides)?;
    Ok(ContextGenerator::new(&root, loaded)?)
}
