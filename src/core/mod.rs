//! Core types and utilities for ctxpack
//!
//! This module contains the path and language types shared by the selection
//! engine and the renderer, plus error handling.

pub mod error;
pub mod types;

// Re-export commonly used items
pub use error::{ContextError, Result};
pub use types::{CodeLanguage, EntryKind, RelPath};
