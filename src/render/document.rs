//! Markdown document assembly
//!
//! A document is an ordered list of sections. Each section is complete
//! Markdown on its own, which lets the output stage split on section
//! boundaries.

use crate::core::types::{CodeLanguage, RelPath};
use crate::render::docs::DocSet;
use chrono::{DateTime, Local};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, warn};

const README_PLACEHOLDER: &str = "## Project Overview\n\n\
    README not found. Please create one with a project description.";

const ISSUES_PLACEHOLDER: &str = "## Chronological List of Issues/Requirements & Resolutions\n\n\
    No issues document found. Summarize the issues encountered and how they were \
    resolved so the assistant understands the rationale behind the current codebase.";

const DESIGN_PLACEHOLDER: &str = "## Key Design Decisions\n\n\
    No design decisions document found.";

const DEFAULT_INSTRUCTIONS: &str = "## Instructions for AI Assistant\n\n\
    * Always refer to the provided codebase files as the authoritative source for the project's current state.\n\
    * When proposing changes, indicate which file(s) are affected and provide clear diffs or updated code blocks.\n\
    * Prioritize addressing issues chronologically as listed, or as directed by the user in the current conversation.\n\
    * Maintain the established code style and structure.\n\
    * Be mindful of the design decisions outlined above.";

/// A rendered Markdown document
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    sections: Vec<String>,
}

impl Document {
    /// Build from rendered sections
    pub fn from_sections(sections: Vec<String>) -> Self {
        Self { sections }
    }

    /// Sections in order; concatenated they form the document
    pub fn sections(&self) -> &[String] {
        &self.sections
    }

    /// The whole document
    pub fn to_markdown(&self) -> String {
        self.sections.concat()
    }

    /// Length in characters
    pub fn char_len(&self) -> usize {
        self.sections.iter().map(|s| s.chars().count()).sum()
    }
}

/// Outcome of reading one embedded file
#[derive(Debug, Clone, PartialEq)]
pub enum FileContent {
    Text(String),
    NotFound,
    NotText,
    Unreadable(String),
}

impl FileContent {
    /// Read a file, turning every failure into a notice
    pub fn read(path: &Path) -> Self {
        match fs::read(path) {
            Ok(bytes) => match String::from_utf8(bytes) {
                Ok(text) => FileContent::Text(text),
                Err(_) => FileContent::NotText,
            },
            Err(e) if e.kind() == ErrorKind::NotFound => FileContent::NotFound,
            Err(e) => FileContent::Unreadable(e.to_string()),
        }
    }
}

/// Assembles the context document for one project
pub struct DocumentBuilder<'a> {
    root: &'a Path,
    project_name: &'a str,
    generated_at: DateTime<Local>,
}

impl<'a> DocumentBuilder<'a> {
    pub fn new(root: &'a Path, project_name: &'a str) -> Self {
        Self {
            root,
            project_name,
            generated_at: Local::now(),
        }
    }

    /// Fix the timestamp shown in the title
    pub fn generated_at(mut self, at: DateTime<Local>) -> Self {
        self.generated_at = at;
        self
    }

    /// Render the preamble docs, the selected files and the instructions
    pub fn build(&self, docs: &DocSet, files: &[RelPath]) -> Document {
        let mut sections = Vec::with_capacity(files.len() + 8);

        sections.push(self.title_section());
        sections.push(self.doc_section(docs.readme.as_ref(), README_PLACEHOLDER));
        sections.push(self.doc_section(docs.issues.as_ref(), ISSUES_PLACEHOLDER));
        sections.push(self.doc_section(docs.design_decisions.as_ref(), DESIGN_PLACEHOLDER));

        if !docs.additional.is_empty() {
            sections.push("## Additional Documentation\n\n".to_string());
            for doc in &docs.additional {
                sections.push(self.additional_doc_section(doc));
            }
        }

        sections.push("## Current Codebase Files\n\n".to_string());
        if files.is_empty() {
            sections.push("_No files were selected._\n\n".to_string());
        }
        for file in files {
            sections.push(self.file_section(file));
        }

        let mut instructions =
            self.doc_section(docs.ai_instructions.as_ref(), DEFAULT_INSTRUCTIONS);
        let trimmed_len = instructions.trim_end().len();
        instructions.truncate(trimmed_len);
        instructions.push('\n');
        sections.push(instructions);

        debug!("Rendered {} sections for {} files", sections.len(), files.len());
        Document::from_sections(sections)
    }

    fn title_section(&self) -> String {
        format!(
            "# Project Context for AI Assistant: {name}\n\n\
             **Generated On:** {at}\n\n\
             This document consolidates the information an AI assistant needs to understand \
             the \"{name}\" project. It includes the project overview, a chronological list of \
             issues and their resolutions, key design decisions, and the full current codebase.\n\n",
            name = self.project_name,
            at = self.generated_at.format("%Y-%m-%d %H:%M:%S"),
        )
    }

    /// A whole document, or the placeholder when it is missing
    fn doc_section(&self, doc: Option<&RelPath>, placeholder: &str) -> String {
        let content = doc.map(|doc| FileContent::read(&doc.to_fs_path(self.root)));
        match content {
            Some(FileContent::Text(text)) => format!("{}\n\n", text.trim_end()),
            Some(FileContent::NotFound) | None => format!("{}\n\n", placeholder),
            Some(other) => {
                warn!("Using placeholder for {:?}: {:?}", doc, other);
                format!("{}\n\n", placeholder)
            },
        }
    }

    fn additional_doc_section(&self, doc: &RelPath) -> String {
        match FileContent::read(&doc.to_fs_path(self.root)) {
            FileContent::Text(text) => {
                format!("### Document: `{}`\n\n{}\n\n", doc, text.trim_end())
            },
            other => format!("### Document: `{}` - {}\n\n", doc, notice(&other)),
        }
    }

    fn file_section(&self, file: &RelPath) -> String {
        match FileContent::read(&file.to_fs_path(self.root)) {
            FileContent::Text(text) => {
                let fence = fence_for(&text);
                let lang = CodeLanguage::for_path(file).fence_tag();
                let body = text.strip_suffix('\n').unwrap_or(&text);
                format!(
                    "### File: `{path}`\n\n{fence}{lang}\n{body}\n{fence}\n\n",
                    path = file,
                    fence = fence,
                    lang = lang,
                    body = body,
                )
            },
            other => {
                warn!("Embedding notice for {}: {}", file, notice(&other));
                format!("### File: `{}` - {}\n\n", file, notice(&other))
            },
        }
    }
}

fn notice(content: &FileContent) -> String {
    match content {
        FileContent::Text(_) => String::new(),
        FileContent::NotFound => "NOT FOUND (it may have been moved or deleted)".to_string(),
        FileContent::NotText => "skipped (not valid UTF-8 text)".to_string(),
        FileContent::Unreadable(reason) => format!("could not be read ({})", reason),
    }
}

/// A backtick fence longer than any backtick run in `text`
fn fence_for(text: &str) -> String {
    let mut longest = 0;
    let mut run = 0;
    for ch in text.chars() {
        if ch == '`' {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 0;
        }
    }
    "`".repeat((longest + 1).max(3))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn rel(path: &str) -> RelPath {
        RelPath::from_config(path).unwrap()
    }

    fn fixed_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap()
    }

    #[test]
    fn test_fence_grows_past_backticks() {
        assert_eq!(fence_for("plain"), "```");
        assert_eq!(fence_for("has ``` inside"), "````");
    }

    #[test]
    fn test_file_sections_are_tagged() -> std::io::Result<()> {
        let temp_dir = TempDir::new()?;
        let root = temp_dir.path();
        fs::write(root.join("app.py"), "print('hi')\n")?;
        fs::write(root.join("data.json"), "{}")?;
        fs::write(root.join("notes.txt"), "plain")?;

        let builder = DocumentBuilder::new(root, "Demo").generated_at(fixed_time());
        let doc = builder
            .build(
                &DocSet::default(),
                &[rel("app.py"), rel("data.json"), rel("notes.txt")],
            )
            .to_markdown();

        assert!(doc.starts_with("# Project Context for AI Assistant: Demo\n"));
        assert!(doc.contains("**Generated On:** 2024-05-01 12:30:00"));
        assert!(doc.contains("### File: `app.py`\n\n```python\nprint('hi')\n```\n"));
        assert!(doc.contains("### File: `data.json`\n\n```json\n{}\n```\n"));
        assert!(doc.contains("### File: `notes.txt`\n\n```text\nplain\n```\n"));
        assert!(doc.ends_with("Be mindful of the design decisions outlined above.\n"));
        Ok(())
    }

    #[test]
    fn test_missing_docs_use_placeholders() -> std::io::Result<()> {
        let temp_dir = TempDir::new()?;
        let docs = DocSet {
            readme: Some(rel("README.md")),
            issues: Some(rel("docs/issues.md")),
            ..Default::default()
        };

        let doc = DocumentBuilder::new(temp_dir.path(), "Demo")
            .build(&docs, &[])
            .to_markdown();

        assert!(doc.contains(README_PLACEHOLDER));
        assert!(doc.contains(ISSUES_PLACEHOLDER));
        assert!(doc.contains(DESIGN_PLACEHOLDER));
        assert!(doc.contains("_No files were selected._"));
        Ok(())
    }

    #[test]
    fn test_present_docs_are_embedded() -> std::io::Result<()> {
        let temp_dir = TempDir::new()?;
        let root = temp_dir.path();
        fs::write(root.join("README.md"), "# Demo\n\nA demo project.\n")?;
        fs::write(root.join("extra.md"), "Extra notes")?;
        fs::write(root.join("rules.md"), "## Rules\n\nBe brief.\n")?;

        let docs = DocSet {
            readme: Some(rel("README.md")),
            ai_instructions: Some(rel("rules.md")),
            additional: vec![rel("extra.md"), rel("gone.md")],
            ..Default::default()
        };
        let doc = DocumentBuilder::new(root, "Demo").build(&docs, &[]).to_markdown();

        assert!(doc.contains("# Demo\n\nA demo project.\n\n"));
        assert!(!doc.contains(README_PLACEHOLDER));
        assert!(doc.contains("## Additional Documentation"));
        assert!(doc.contains("### Document: `extra.md`\n\nExtra notes\n\n"));
        assert!(doc.contains("### Document: `gone.md` - NOT FOUND"));
        assert!(doc.ends_with("Be brief.\n"));
        assert!(!doc.contains("## Instructions for AI Assistant"));
        Ok(())
    }

    #[test]
    fn test_vanished_file_becomes_notice() -> std::io::Result<()> {
        let temp_dir = TempDir::new()?;
        let doc = DocumentBuilder::new(temp_dir.path(), "Demo")
            .build(&DocSet::default(), &[rel("src/removed.rs")])
            .to_markdown();

        assert!(doc.contains("### File: `src/removed.rs` - NOT FOUND"));
        Ok(())
    }

    #[test]
    fn test_char_len_matches_markdown() {
        let doc = Document::from_sections(vec!["héllo ".to_string(), "wörld\n".to_string()]);
        assert_eq!(doc.char_len(), doc.to_markdown().chars().count());
        assert_eq!(doc.char_len(), 12);
    }
}
