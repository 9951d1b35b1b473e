//! Documentation files embedded ahead of the codebase

use crate::config::GeneratorConfig;
use crate::core::types::RelPath;
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// The documents a run embeds in the preamble
#[derive(Debug, Clone, Default)]
pub struct DocSet {
    pub readme: Option<RelPath>,
    pub issues: Option<RelPath>,
    pub design_decisions: Option<RelPath>,
    pub ai_instructions: Option<RelPath>,
    /// Optional docs followed by markdown found in doc folders
    pub additional: Vec<RelPath>,
}

impl DocSet {
    /// Resolve configured documents and scan doc folders
    pub fn collect(root: &Path, config: &GeneratorConfig) -> Self {
        let fixed = [
            &config.readme,
            &config.issues_doc,
            &config.design_decisions_doc,
            &config.ai_instructions_doc,
        ];
        let mut seen: BTreeSet<RelPath> = fixed
            .iter()
            .filter_map(|doc| RelPath::from_config(doc))
            .collect();

        let mut additional = Vec::new();
        for doc in &config.optional_docs {
            match RelPath::from_config(doc) {
                Some(rel) if seen.insert(rel.clone()) => additional.push(rel),
                Some(_) => {},
                None => warn!("Ignoring optional doc outside the project: {}", doc),
            }
        }

        for folder in &config.doc_folders {
            let Some(rel_folder) = RelPath::from_config(folder) else {
                warn!("Ignoring doc folder outside the project: {}", folder);
                continue;
            };
            for doc in scan_doc_folder(root, &rel_folder) {
                if seen.insert(doc.clone()) {
                    additional.push(doc);
                }
            }
        }

        Self {
            readme: RelPath::from_config(&config.readme),
            issues: RelPath::from_config(&config.issues_doc),
            design_decisions: RelPath::from_config(&config.design_decisions_doc),
            ai_instructions: RelPath::from_config(&config.ai_instructions_doc),
            additional,
        }
    }

    /// Every document path, for excluding them from the codebase section
    pub fn embedded_paths(&self) -> Vec<RelPath> {
        [
            &self.readme,
            &self.issues,
            &self.design_decisions,
            &self.ai_instructions,
        ]
        .into_iter()
        .flatten()
        .chain(self.additional.iter())
        .cloned()
        .collect()
    }
}

/// Markdown files below `folder`, sorted; hidden and unreadable entries are skipped
fn scan_doc_folder(root: &Path, folder: &RelPath) -> Vec<RelPath> {
    let dir = folder.to_fs_path(root);
    if !dir.is_dir() {
        warn!("Doc folder not found: {}", folder);
        return Vec::new();
    }

    let mut docs = Vec::new();
    let walker = WalkDir::new(&dir)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() == 0 || !entry.file_name().to_string_lossy().starts_with('.')
        });

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry in doc folder {}: {}", folder, e);
                continue;
            },
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let is_markdown = entry
            .path()
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("md"))
            .unwrap_or(false);
        if !is_markdown {
            continue;
        }
        if let Some(rel) = entry
            .path()
            .strip_prefix(root)
            .ok()
            .and_then(RelPath::from_path)
        {
            docs.push(rel);
        }
    }

    docs.sort();
    debug!("Found {} markdown files in {}", docs.len(), folder);
    docs
}
