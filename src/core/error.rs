//! Error types for ctxpack

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for context generation
#[derive(Error, Debug)]
pub enum ContextError {
    /// Project root errors
    #[error("Project root not found: {path}")]
    RootNotFound { path: PathBuf },

    #[error("Project root is not a directory: {path}")]
    RootNotDirectory { path: PathBuf },

    /// Ignore pattern errors
    #[error("Invalid ignore pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Pattern has nothing to match: '{line}'")]
    EmptyPattern { line: String },

    /// Configuration errors
    #[error("Configuration error: {reason}")]
    Configuration { reason: String },

    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    #[error("Refusing to overwrite existing file: {path}")]
    AlreadyExists { path: PathBuf },

    /// Output errors
    #[error("Failed to write output {path}: {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ContextError {
    /// Create a new configuration error
    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration {
            reason: reason.into(),
        }
    }

    /// Create a new invalid pattern error
    pub fn invalid_pattern(pattern: impl Into<String>, source: regex::Error) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            source,
        }
    }

    /// Create a new output write error
    pub fn output_write(path: PathBuf, source: std::io::Error) -> Self {
        Self::OutputWrite { path, source }
    }
}

/// Result type alias for ctxpack operations
pub type Result<T> = std::result::Result<T, ContextError>;
