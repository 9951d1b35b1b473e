//! File selection with gitignore-style rules
//!
//! This module turns an ignore file into ordered rules, combines them with
//! configuration-driven excludes, and walks a project tree pruning excluded
//! directories before they are entered.

pub mod checker;
pub mod parser;
pub mod scanner;

// Re-export commonly used items
pub use checker::{ExcludeReason, IgnoreChecker, PathDecision, StaticExcludes};
pub use parser::{compile, IgnoreRule, IgnoreRules};
pub use scanner::{select_files, ScanPhase, ScanProgress, ScanResult, ScanStats, TreeSelector};
