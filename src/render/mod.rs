//! Markdown rendering of the selected files
//!
//! Documentation goes first, then every selected file in a fenced block,
//! then the assistant instructions. Missing or unreadable inputs become
//! notices in the document rather than errors.

pub mod docs;
pub mod document;
pub mod output;

// Re-export commonly used items
pub use docs::DocSet;
pub use document::{Document, DocumentBuilder, FileContent};
pub use output::{split_document, truncate_document, write_document, OutputReport, OverflowMode};
