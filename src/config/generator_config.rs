//! Generator configuration
//!
//! Settings live in `ctxpack.toml` at the project root (or an explicit path).
//! Every field has a default, so an absent file is the same as an empty one.

use crate::core::error::{ContextError, Result};
use crate::core::types::RelPath;
use crate::ignore::checker::StaticExcludes;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// File name looked up at the project root
pub const CONFIG_FILE_NAME: &str = "ctxpack.toml";

/// Settings for one generation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Name shown in the document title
    pub project_name: String,
    /// Output document, relative to the root
    pub output_file: String,
    /// Ignore file, relative to the root
    pub ignore_file: String,
    /// Project overview document
    pub readme: String,
    /// Chronological issues document
    pub issues_doc: String,
    /// Design decisions document
    pub design_decisions_doc: String,
    /// Instructions for the assistant
    pub ai_instructions_doc: String,
    /// Extra markdown files embedded in the preamble
    pub optional_docs: Vec<String>,
    /// Folders scanned recursively for `.md` files
    pub doc_folders: Vec<String>,
    /// Files never embedded in the codebase section
    pub exclude_files: Vec<String>,
    /// Folders never entered; bare names match at any depth
    pub exclude_folders: Vec<String>,
    /// The generator's own entry point, if it lives in the tree
    pub generator_entry: Option<String>,
    /// Size limit for one output file, in characters
    pub max_output_characters: usize,
    /// Split into numbered parts instead of truncating
    pub split_output: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            project_name: "New Project".to_string(),
            output_file: "project_context.md".to_string(),
            ignore_file: ".gitignore".to_string(),
            readme: "README.md".to_string(),
            issues_doc: "docs/project_issues.md".to_string(),
            design_decisions_doc: "docs/design_decisions.md".to_string(),
            ai_instructions_doc: "docs/ai_instructions.md".to_string(),
            optional_docs: Vec::new(),
            doc_folders: Vec::new(),
            exclude_files: Vec::new(),
            exclude_folders: vec![
                "target".to_string(),
                "node_modules".to_string(),
                "__pycache__".to_string(),
            ],
            generator_entry: None,
            max_output_characters: 500_000,
            split_output: true,
        }
    }
}

/// Command-line values layered over the file
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub project_name: Option<String>,
    pub output_file: Option<String>,
    pub ignore_file: Option<String>,
    pub max_output_characters: Option<usize>,
    pub no_split: bool,
    pub exclude_files: Vec<String>,
    pub exclude_folders: Vec<String>,
}

/// A configuration together with the file it came from
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: GeneratorConfig,
    /// `None` when defaults were used
    pub source: Option<PathBuf>,
}

impl GeneratorConfig {
    /// Load configuration for `root`.
    ///
    /// An explicit path must exist; otherwise `<root>/ctxpack.toml` is used
    /// when present and defaults when not.
    pub fn load(root: &Path, explicit: Option<&Path>) -> Result<LoadedConfig> {
        let path = match explicit {
            Some(path) => {
                let path = if path.is_absolute() {
                    path.to_path_buf()
                } else {
                    root.join(path)
                };
                if !path.is_file() {
                    return Err(ContextError::ConfigNotFound { path });
                }
                path
            },
            None => {
                let path = root.join(CONFIG_FILE_NAME);
                if !path.is_file() {
                    debug!("No {} in {}, using defaults", CONFIG_FILE_NAME, root.display());
                    return Ok(LoadedConfig {
                        config: Self::default(),
                        source: None,
                    });
                }
                path
            },
        };

        let content = fs::read_to_string(&path)?;
        let config = Self::from_toml_str(&content).map_err(|e| match e {
            ContextError::Configuration { reason } => ContextError::configuration(format!(
                "{}: {}",
                path.display(),
                reason
            )),
            other => other,
        })?;
        info!("Loaded configuration from {}", path.display());

        Ok(LoadedConfig {
            config,
            source: Some(path),
        })
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: GeneratorConfig = toml::from_str(content)
            .map_err(|e| ContextError::configuration(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration as TOML
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| ContextError::configuration(format!("Failed to serialize config: {}", e)))
    }

    /// Write configuration to `path`, refusing to replace an existing file
    /// unless `force` is set
    pub fn save(&self, path: &Path, force: bool) -> Result<()> {
        if path.exists() && !force {
            return Err(ContextError::AlreadyExists {
                path: path.to_path_buf(),
            });
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }

    /// Check values that serde cannot
    pub fn validate(&self) -> Result<()> {
        if self.max_output_characters == 0 {
            return Err(ContextError::configuration(
                "max_output_characters must be greater than zero",
            ));
        }
        if RelPath::from_config(&self.output_file).is_none() {
            return Err(ContextError::configuration(format!(
                "output_file '{}' must be a path inside the project",
                self.output_file
            )));
        }
        Ok(())
    }

    /// Layer command-line values over this configuration
    pub fn apply(&mut self, overrides: ConfigOverrides) -> Result<()> {
        if let Some(name) = overrides.project_name {
            self.project_name = name;
        }
        if let Some(output) = overrides.output_file {
            self.output_file = output;
        }
        if let Some(ignore) = overrides.ignore_file {
            self.ignore_file = ignore;
        }
        if let Some(max) = overrides.max_output_characters {
            self.max_output_characters = max;
        }
        if overrides.no_split {
            self.split_output = false;
        }
        self.exclude_files.extend(overrides.exclude_files);
        self.exclude_folders.extend(overrides.exclude_folders);
        self.validate()
    }

    /// Absolute path of the ignore file
    pub fn ignore_path(&self, root: &Path) -> PathBuf {
        resolve(root, &self.ignore_file)
    }

    /// Absolute path of the output document
    pub fn output_path(&self, root: &Path) -> PathBuf {
        resolve(root, &self.output_file)
    }

    /// Build the static exclude set for a run.
    ///
    /// `embedded_docs` are the documentation files rendered in the preamble;
    /// `config_source` is the file this configuration was read from.
    pub fn static_excludes(
        &self,
        root: &Path,
        embedded_docs: &[RelPath],
        config_source: Option<&Path>,
    ) -> StaticExcludes {
        let mut excludes = StaticExcludes::new();

        if let Some(output) = RelPath::from_config(&self.output_file) {
            excludes = excludes.output_file(output);
        }

        let entries = config_source
            .and_then(|source| relative_to_root(root, source))
            .into_iter()
            .chain(
                self.generator_entry
                    .as_deref()
                    .and_then(RelPath::from_config),
            );
        for entry in entries {
            excludes = excludes.generator_entry(entry);
        }

        excludes
            .embedded_docs(embedded_docs.iter().cloned())
            .exclude_files(self.exclude_files.iter().filter_map(|f| RelPath::from_config(f)))
            .exclude_folders(self.exclude_folders.iter().filter_map(|f| RelPath::from_config(f)))
    }
}

fn resolve(root: &Path, configured: &str) -> PathBuf {
    let path = Path::new(configured);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

/// Express `path` relative to `root`, if it lies inside it
pub fn relative_to_root(root: &Path, path: &Path) -> Option<RelPath> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    };
    let absolute = dunce::canonicalize(&absolute).unwrap_or(absolute);
    let root = dunce::canonicalize(root).unwrap_or_else(|_| root.to_path_buf());

    absolute
        .strip_prefix(&root)
        .ok()
        .and_then(RelPath::from_path)
        .filter(|rel| !rel.is_root())
}
