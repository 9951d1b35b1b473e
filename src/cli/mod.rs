//! Command-line interface for ctxpack

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;

/// ctxpack - bundle a project into one Markdown document for an AI chat
#[derive(Parser)]
#[command(
    name = "ctxpack",
    version,
    about = "Concatenate a project's docs and source files into one Markdown context document",
    long_about = "ctxpack walks a project directory, filters files against a gitignore-style ignore file and configured excludes, and writes the selected documentation and source files into a single Markdown document for pasting into an AI chat."
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Project root directory
    #[arg(long, global = true, default_value = ".")]
    pub root: PathBuf,

    /// Configuration file (default: <root>/ctxpack.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate the context document (default)
    Generate(GenerateArgs),

    /// List the files that would be embedded
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Also show skipped files and pruned directories
        #[arg(long)]
        all: bool,
    },

    /// Explain why paths are included or excluded
    CheckIgnore {
        /// Paths relative to the project root
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write a default configuration file
    Init {
        /// Overwrite an existing configuration file
        #[arg(short, long)]
        force: bool,
    },
}

/// Options for `generate`
#[derive(Args, Debug, Clone, Default)]
pub struct GenerateArgs {
    /// Output file name, relative to the root
    #[arg(short, long)]
    pub output: Option<String>,

    /// Project name shown in the document title
    #[arg(short, long)]
    pub name: Option<String>,

    /// Ignore file, relative to the root
    #[arg(long)]
    pub ignore_file: Option<String>,

    /// Maximum characters per output file
    #[arg(long)]
    pub max_chars: Option<usize>,

    /// Truncate instead of splitting when over the limit
    #[arg(long)]
    pub no_split: bool,

    /// Additional file to exclude (repeatable)
    #[arg(long = "exclude-file", value_name = "PATH")]
    pub exclude_files: Vec<String>,

    /// Additional folder to exclude (repeatable)
    #[arg(long = "exclude-folder", value_name = "PATH")]
    pub exclude_folders: Vec<String>,

    /// Show what would be written without writing it
    #[arg(long)]
    pub dry_run: bool,
}
