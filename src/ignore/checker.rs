//! Per-path inclusion decisions combining ignore rules and static excludes

use crate::core::types::{EntryKind, RelPath};
use crate::ignore::parser::IgnoreRules;
use crate::render::output::is_part_name;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Why a path is excluded by configuration rather than by pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExcludeReason {
    /// The generated document, or one of its split parts
    OutputFile,
    /// The generator's own entry point (its config file or script)
    GeneratorEntry,
    /// A documentation file already embedded in another section
    EmbeddedDoc,
    /// Listed under `exclude_files`
    ExcludedFile,
    /// Listed under `exclude_folders`
    ExcludedFolder,
}

impl fmt::Display for ExcludeReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ExcludeReason::OutputFile => "output file",
            ExcludeReason::GeneratorEntry => "generator entry point",
            ExcludeReason::EmbeddedDoc => "embedded documentation",
            ExcludeReason::ExcludedFile => "excluded file",
            ExcludeReason::ExcludedFolder => "excluded folder",
        };
        f.write_str(text)
    }
}

/// Result of deciding a single path
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum PathDecision {
    /// Path should be included
    Included,
    /// Name starts with `.`
    Hidden,
    /// Excluded by configuration
    StaticExclude { reason: ExcludeReason },
    /// Excluded by the named ignore rule
    Ignored { rule: String },
    /// An ignore rule matched but a later negation re-included the path
    IncludedByNegation { rule: String },
    /// An ancestor directory is pruned, so the path is never visited
    InsidePruned {
        directory: RelPath,
        cause: Box<PathDecision>,
    },
}

impl PathDecision {
    /// Whether the path stays out of the selection
    pub fn is_excluded(&self) -> bool {
        !matches!(
            self,
            PathDecision::Included | PathDecision::IncludedByNegation { .. }
        )
    }
}

impl fmt::Display for PathDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathDecision::Included => write!(f, "included"),
            PathDecision::Hidden => write!(f, "hidden entry"),
            PathDecision::StaticExclude { reason } => write!(f, "{}", reason),
            PathDecision::Ignored { rule } => write!(f, "ignored by '{}'", rule),
            PathDecision::IncludedByNegation { rule } => {
                write!(f, "re-included by '{}'", rule)
            },
            PathDecision::InsidePruned { directory, cause } => {
                write!(f, "inside pruned directory '{}' ({})", directory, cause)
            },
        }
    }
}

/// Paths excluded by configuration, independent of ignore patterns
#[derive(Debug, Clone, Default)]
pub struct StaticExcludes {
    files: BTreeMap<RelPath, ExcludeReason>,
    /// Folder entries; a bare name matches at any depth
    folders: Vec<RelPath>,
    output: Option<RelPath>,
}

impl StaticExcludes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exclude the generated document and any `<stem>_partN.<ext>` siblings
    pub fn output_file(mut self, path: RelPath) -> Self {
        self.files.insert(path.clone(), ExcludeReason::OutputFile);
        self.output = Some(path);
        self
    }

    /// Exclude the generator's own entry point
    pub fn generator_entry(mut self, path: RelPath) -> Self {
        self.files.entry(path).or_insert(ExcludeReason::GeneratorEntry);
        self
    }

    /// Exclude documentation files embedded in the preamble
    pub fn embedded_docs<I>(mut self, docs: I) -> Self
    where
        I: IntoIterator<Item = RelPath>,
    {
        for doc in docs {
            self.files.entry(doc).or_insert(ExcludeReason::EmbeddedDoc);
        }
        self
    }

    /// Exclude explicitly listed files
    pub fn exclude_files<I>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = RelPath>,
    {
        for file in files {
            self.files.entry(file).or_insert(ExcludeReason::ExcludedFile);
        }
        self
    }

    /// Exclude explicitly listed folders
    pub fn exclude_folders<I>(mut self, folders: I) -> Self
    where
        I: IntoIterator<Item = RelPath>,
    {
        self.folders.extend(folders);
        self
    }

    /// Reason a file is statically excluded, if it is
    pub fn file_reason(&self, path: &RelPath) -> Option<ExcludeReason> {
        if let Some(reason) = self.files.get(path) {
            return Some(*reason);
        }
        if self.is_output_part(path) {
            return Some(ExcludeReason::OutputFile);
        }
        None
    }

    /// Whether a directory is statically excluded
    pub fn folder_excluded(&self, path: &RelPath) -> bool {
        self.folders.iter().any(|folder| {
            if folder.as_str().contains('/') {
                folder == path
            } else {
                folder.as_str() == path.basename()
            }
        })
    }

    fn is_output_part(&self, path: &RelPath) -> bool {
        let Some(output) = &self.output else {
            return false;
        };
        if parent_of(output) != parent_of(path) {
            return false;
        }

        is_part_name(output.basename(), path.basename())
    }
}

fn parent_of(path: &RelPath) -> &str {
    path.as_str()
        .rfind('/')
        .map(|idx| &path.as_str()[..idx])
        .unwrap_or("")
}

/// Decides paths against one rule set and one set of static excludes
#[derive(Debug, Clone, Copy)]
pub struct IgnoreChecker<'a> {
    rules: &'a IgnoreRules,
    excludes: &'a StaticExcludes,
}

impl<'a> IgnoreChecker<'a> {
    pub fn new(rules: &'a IgnoreRules, excludes: &'a StaticExcludes) -> Self {
        Self { rules, excludes }
    }

    /// Decide a single entry, looking only at the entry itself
    pub fn decide(&self, path: &RelPath, kind: EntryKind) -> PathDecision {
        if path.basename().starts_with('.') {
            return PathDecision::Hidden;
        }

        let static_reason = match kind {
            EntryKind::File => self.excludes.file_reason(path),
            EntryKind::Directory if self.excludes.folder_excluded(path) => {
                Some(ExcludeReason::ExcludedFolder)
            },
            EntryKind::Directory => None,
        };
        if let Some(reason) = static_reason {
            return PathDecision::StaticExclude { reason };
        }

        match self.rules.last_match(path) {
            None => PathDecision::Included,
            Some(rule) if !rule.negated => PathDecision::Ignored {
                rule: rule.original.clone(),
            },
            Some(rule) if self.rules.ignored_before(path, rule) => {
                PathDecision::IncludedByNegation {
                    rule: rule.original.clone(),
                }
            },
            Some(_) => PathDecision::Included,
        }
    }

    /// Decide an entry the way a walk from the root would reach it.
    ///
    /// Each ancestor directory is checked first; the first pruned ancestor
    /// wins over whatever the entry itself would get.
    pub fn decide_from_root(&self, path: &RelPath, kind: EntryKind) -> PathDecision {
        let mut ancestor = RelPath::root();
        let segments: Vec<&str> = path.as_str().split('/').collect();

        for segment in &segments[..segments.len().saturating_sub(1)] {
            ancestor = ancestor.join(segment);
            let decision = self.decide(&ancestor, EntryKind::Directory);
            if decision.is_excluded() {
                return PathDecision::InsidePruned {
                    directory: ancestor,
                    cause: Box::new(decision),
                };
            }
        }

        self.decide(path, kind)
    }

    pub fn rules(&self) -> &IgnoreRules {
        self.rules
    }

    pub fn excludes(&self) -> &StaticExcludes {
        self.excludes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rel(path: &str) -> RelPath {
        RelPath::from_config(path).unwrap()
    }

    #[test]
    fn test_hidden_wins_over_everything() {
        let rules = IgnoreRules::from_content("!.env\n");
        let excludes = StaticExcludes::new();
        let checker = IgnoreChecker::new(&rules, &excludes);

        assert_eq!(checker.decide(&rel(".env"), EntryKind::File), PathDecision::Hidden);
        assert_eq!(checker.decide(&rel(".git"), EntryKind::Directory), PathDecision::Hidden);
    }

    #[test]
    fn test_static_excludes() {
        let rules = IgnoreRules::empty();
        let excludes = StaticExcludes::new()
            .output_file(rel("project_context.md"))
            .generator_entry(rel("ctxpack.toml"))
            .embedded_docs(vec![rel("README.md")])
            .exclude_files(vec![rel("secrets.py")])
            .exclude_folders(vec![rel("target"), rel("docs/generated")]);
        let checker = IgnoreChecker::new(&rules, &excludes);

        let reason = |path: &str, kind| match checker.decide(&rel(path), kind) {
            PathDecision::StaticExclude { reason } => Some(reason),
            _ => None,
        };

        assert_eq!(reason("project_context.md", EntryKind::File), Some(ExcludeReason::OutputFile));
        assert_eq!(
            reason("project_context_part2.md", EntryKind::File),
            Some(ExcludeReason::OutputFile)
        );
        assert_eq!(reason("project_context_partx.md", EntryKind::File), None);
        assert_eq!(reason("ctxpack.toml", EntryKind::File), Some(ExcludeReason::GeneratorEntry));
        assert_eq!(reason("README.md", EntryKind::File), Some(ExcludeReason::EmbeddedDoc));
        assert_eq!(reason("docs/README.md", EntryKind::File), None);
        assert_eq!(reason("secrets.py", EntryKind::File), Some(ExcludeReason::ExcludedFile));
        assert_eq!(reason("target", EntryKind::Directory), Some(ExcludeReason::ExcludedFolder));
        assert_eq!(
            reason("crates/core/target", EntryKind::Directory),
            Some(ExcludeReason::ExcludedFolder)
        );
        assert_eq!(
            reason("docs/generated", EntryKind::Directory),
            Some(ExcludeReason::ExcludedFolder)
        );
        assert_eq!(reason("site/docs/generated", EntryKind::Directory), None);
    }

    #[test]
    fn test_rule_decisions() {
        let rules = IgnoreRules::from_content("*.log\n!keep.log\n!fresh.txt\n");
        let excludes = StaticExcludes::new();
        let checker = IgnoreChecker::new(&rules, &excludes);

        assert_eq!(
            checker.decide(&rel("app.log"), EntryKind::File),
            PathDecision::Ignored {
                rule: "*.log".to_string()
            }
        );
        assert_eq!(
            checker.decide(&rel("keep.log"), EntryKind::File),
            PathDecision::IncludedByNegation {
                rule: "!keep.log".to_string()
            }
        );
        assert_eq!(checker.decide(&rel("fresh.txt"), EntryKind::File), PathDecision::Included);
    }

    #[test]
    fn test_decide_from_root_reports_pruned_ancestor() {
        let rules = IgnoreRules::from_content("build/\n!build/keep.txt\n");
        let excludes = StaticExcludes::new();
        let checker = IgnoreChecker::new(&rules, &excludes);

        let path = rel("build/keep.txt");
        assert!(!checker.decide(&path, EntryKind::File).is_excluded());

        match checker.decide_from_root(&path, EntryKind::File) {
            PathDecision::InsidePruned { directory, cause } => {
                assert_eq!(directory.as_str(), "build");
                assert_eq!(
                    *cause,
                    PathDecision::Ignored {
                        rule: "build/".to_string()
                    }
                );
            },
            other => panic!("expected InsidePruned, got {:?}", other),
        }
    }
}
