//! One generation run: load rules, select files, render, write

use crate::config::{GeneratorConfig, LoadedConfig};
use crate::core::error::{ContextError, Result};
use crate::core::types::{EntryKind, RelPath};
use crate::ignore::{
    IgnoreChecker, IgnoreRules, PathDecision, ScanProgress, ScanResult, StaticExcludes,
    TreeSelector,
};
use crate::render::{DocSet, Document, DocumentBuilder, OutputReport, OverflowMode};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Everything a run needs, built once and shared by reference
#[derive(Debug)]
pub struct ContextGenerator {
    root: PathBuf,
    config: GeneratorConfig,
    rules: IgnoreRules,
    docs: DocSet,
    excludes: StaticExcludes,
}

/// Summary of a completed run
#[derive(Debug)]
pub struct GenerationReport {
    pub scan: ScanResult,
    pub output: OutputReport,
}

impl ContextGenerator {
    /// Prepare a run for `root` with an already-loaded configuration
    pub fn new(root: &Path, loaded: LoadedConfig) -> Result<Self> {
        if !root.is_dir() {
            return Err(if root.exists() {
                ContextError::RootNotDirectory {
                    path: root.to_path_buf(),
                }
            } else {
                ContextError::RootNotFound {
                    path: root.to_path_buf(),
                }
            });
        }
        let root = dunce::canonicalize(root)?;
        let LoadedConfig { config, source } = loaded;

        let rules = IgnoreRules::from_file(&config.ignore_path(&root));
        let docs = DocSet::collect(&root, &config);
        let excludes = config.static_excludes(&root, &docs.embedded_paths(), source.as_deref());

        info!(
            "Prepared {} with {} ignore rules and {} extra docs",
            root.display(),
            rules.len(),
            docs.additional.len()
        );

        Ok(Self {
            root,
            config,
            rules,
            docs,
            excludes,
        })
    }

    /// Load configuration from `root` (or `config_path`) and prepare a run
    pub fn open(root: &Path, config_path: Option<&Path>) -> Result<Self> {
        let loaded = GeneratorConfig::load(root, config_path)?;
        Self::new(root, loaded)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn rules(&self) -> &IgnoreRules {
        &self.rules
    }

    pub fn docs(&self) -> &DocSet {
        &self.docs
    }

    pub fn checker(&self) -> IgnoreChecker<'_> {
        IgnoreChecker::new(&self.rules, &self.excludes)
    }

    /// Walk the tree and select files
    pub fn select(&self) -> Result<ScanResult> {
        TreeSelector::new(&self.root, self.checker())?.select()
    }

    /// Walk the tree, reporting progress per directory
    pub fn select_with_progress<'s, F>(&'s self, progress: F) -> Result<ScanResult>
    where
        F: Fn(&ScanProgress) + 's,
    {
        TreeSelector::new(&self.root, self.checker())?
            .with_progress(progress)
            .select()
    }

    /// Explain how a path relative to the root is decided
    pub fn explain(&self, path: &RelPath) -> PathDecision {
        let kind = if path.to_fs_path(&self.root).is_dir() {
            EntryKind::Directory
        } else {
            EntryKind::File
        };
        self.checker().decide_from_root(path, kind)
    }

    /// Render the document for a selection
    pub fn render(&self, files: &[RelPath]) -> Document {
        DocumentBuilder::new(&self.root, &self.config.project_name).build(&self.docs, files)
    }

    /// Absolute output path
    pub fn output_path(&self) -> PathBuf {
        self.config.output_path(&self.root)
    }

    /// Write a rendered document according to the size settings
    pub fn write(&self, document: &Document) -> Result<OutputReport> {
        let mode = if self.config.split_output {
            OverflowMode::Split
        } else {
            OverflowMode::Truncate
        };
        crate::render::write_document(
            document,
            &self.output_path(),
            self.config.max_output_characters,
            mode,
        )
    }

    /// Select, render and write in one go
    pub fn generate(&self) -> Result<GenerationReport> {
        let scan = self.select()?;
        debug!("Rendering {} selected files", scan.files.len());
        let document = self.render(&scan.files);
        let output = self.write(&document)?;
        Ok(GenerationReport { scan, output })
    }
}
