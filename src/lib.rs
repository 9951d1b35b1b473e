//! ctxpack - bundle a project into one Markdown document for an AI assistant
//!
//! ctxpack walks a project directory, filters files against a gitignore-style
//! ignore file plus configured excludes, and concatenates the selected
//! documentation and source files into a single Markdown document.
//!
//! # Core Features
//!
//! - **Ignore rules**: gitignore-style patterns compiled once, last match wins
//! - **Pruning walk**: excluded directories are never entered
//! - **Static excludes**: the output, the generator's own config, embedded docs
//! - **Size limits**: oversized output is split into parts or truncated
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use ctxpack::{ContextGenerator, IgnoreRules, StaticExcludes};
//! use std::path::Path;
//!
//! // Just the selection
//! let rules = IgnoreRules::from_file(Path::new("./my-project/.gitignore"));
//! let files = ctxpack::select_files(Path::new("./my-project"), &rules, &StaticExcludes::new())?;
//!
//! // A full run driven by ctxpack.toml
//! let generator = ContextGenerator::open(Path::new("./my-project"), None)?;
//! let report = generator.generate()?;
//! println!("{} files written to {:?}", files.len(), report.output.files);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod generator;
pub mod ignore;
pub mod render;

// Re-export commonly used types
pub use core::{
    error::{ContextError, Result},
    types::{CodeLanguage, EntryKind, RelPath},
};

pub use config::{GeneratorConfig, CONFIG_FILE_NAME};

pub use generator::{ContextGenerator, GenerationReport};

pub use ignore::{
    compile, select_files, IgnoreChecker, IgnoreRule, IgnoreRules, PathDecision, StaticExcludes,
    TreeSelector,
};

/// Current version of ctxpack
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
