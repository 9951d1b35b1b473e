//! Tree selector: walks the project and picks the files to embed
//!
//! The walk keeps an explicit worklist of `(directory, relative prefix)`
//! pairs. Every directory entry is decided before it is pushed, so a pruned
//! directory is never opened and nothing beneath it can be selected.

use crate::core::error::{ContextError, Result};
use crate::core::types::{EntryKind, RelPath};
use crate::ignore::checker::{IgnoreChecker, PathDecision, StaticExcludes};
use crate::ignore::parser::IgnoreRules;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Phase of a selection walk
#[derive(Debug, Clone, PartialEq)]
pub enum ScanPhase {
    /// Reading directories
    Walking,
    /// Walk finished, results sorted
    Complete,
}

/// Progress information during the walk
#[derive(Debug, Clone)]
pub struct ScanProgress {
    pub phase: ScanPhase,
    pub dirs_visited: usize,
    pub files_seen: usize,
    pub files_selected: usize,
    /// Directory just finished
    pub current_dir: Option<RelPath>,
    pub elapsed: Duration,
}

/// Statistics from a selection walk
#[derive(Debug, Clone, Default)]
pub struct ScanStats {
    pub dirs_visited: usize,
    pub dirs_pruned: usize,
    pub files_seen: usize,
    pub files_selected: usize,
    pub files_skipped: usize,
    pub elapsed: Duration,
}

/// Result of a selection walk
#[derive(Debug)]
pub struct ScanResult {
    /// Selected files, sorted
    pub files: Vec<RelPath>,
    /// Directories that were not entered, sorted
    pub pruned_dirs: Vec<(RelPath, PathDecision)>,
    /// Files seen but not selected, sorted
    pub skipped_files: Vec<(RelPath, PathDecision)>,
    pub stats: ScanStats,
}

/// What to do with a directory entry
#[derive(Debug)]
enum DirVerdict {
    Descend,
    Prune(PathDecision),
}

/// Walks a project root and selects files
pub struct TreeSelector<'a> {
    root: PathBuf,
    checker: IgnoreChecker<'a>,
    progress_callback: Option<Box<dyn Fn(&ScanProgress) + 'a>>,
}

impl<'a> TreeSelector<'a> {
    /// Create a selector for `root`, which must be an existing directory
    pub fn new(root: &Path, checker: IgnoreChecker<'a>) -> Result<Self> {
        if !root.exists() {
            return Err(ContextError::RootNotFound {
                path: root.to_path_buf(),
            });
        }
        if !root.is_dir() {
            return Err(ContextError::RootNotDirectory {
                path: root.to_path_buf(),
            });
        }

        Ok(Self {
            root: root.to_path_buf(),
            checker,
            progress_callback: None,
        })
    }

    /// Set progress callback, called once per directory and at completion
    pub fn with_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(&ScanProgress) + 'a,
    {
        self.progress_callback = Some(Box::new(callback));
        self
    }

    /// Walk the tree and return the sorted selection
    pub fn select(&self) -> Result<ScanResult> {
        let start_time = Instant::now();
        let mut stats = ScanStats::default();
        let mut files = Vec::new();
        let mut pruned_dirs = Vec::new();
        let mut skipped_files = Vec::new();

        let mut worklist: Vec<(PathBuf, RelPath)> = vec![(self.root.clone(), RelPath::root())];

        while let Some((dir, prefix)) = worklist.pop() {
            let entries = match fs::read_dir(&dir) {
                Ok(entries) => entries,
                // The root itself must be readable
                Err(e) if prefix.is_root() => return Err(ContextError::Io(e)),
                Err(e) => {
                    warn!("Skipping unreadable directory {}: {}", dir.display(), e);
                    continue;
                },
            };
            stats.dirs_visited += 1;

            for entry in entries {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        warn!("Skipping unreadable entry in {}: {}", dir.display(), e);
                        continue;
                    },
                };

                let name = match entry.file_name().into_string() {
                    Ok(name) => name,
                    Err(raw) => {
                        warn!("Skipping non UTF-8 name {:?} in {}", raw, dir.display());
                        continue;
                    },
                };
                let rel_path = prefix.join(&name);

                let Some(kind) = entry_kind(&entry) else {
                    debug!("Not following {}", rel_path);
                    continue;
                };

                match kind {
                    EntryKind::Directory => match self.dir_verdict(&rel_path) {
                        DirVerdict::Descend => worklist.push((entry.path(), rel_path)),
                        DirVerdict::Prune(decision) => {
                            debug!("Pruning {}/ ({})", rel_path, decision);
                            stats.dirs_pruned += 1;
                            pruned_dirs.push((rel_path, decision));
                        },
                    },
                    EntryKind::File => {
                        stats.files_seen += 1;
                        let decision = self.checker.decide(&rel_path, EntryKind::File);
                        if decision.is_excluded() {
                            debug!("Skipping {} ({})", rel_path, decision);
                            stats.files_skipped += 1;
                            skipped_files.push((rel_path, decision));
                        } else {
                            stats.files_selected += 1;
                            files.push(rel_path);
                        }
                    },
                }
            }

            self.report_progress(&ScanProgress {
                phase: ScanPhase::Walking,
                dirs_visited: stats.dirs_visited,
                files_seen: stats.files_seen,
                files_selected: stats.files_selected,
                current_dir: Some(prefix),
                elapsed: start_time.elapsed(),
            });
        }

        files.sort();
        pruned_dirs.sort_by(|a, b| a.0.cmp(&b.0));
        skipped_files.sort_by(|a, b| a.0.cmp(&b.0));
        stats.elapsed = start_time.elapsed();

        self.report_progress(&ScanProgress {
            phase: ScanPhase::Complete,
            dirs_visited: stats.dirs_visited,
            files_seen: stats.files_seen,
            files_selected: stats.files_selected,
            current_dir: None,
            elapsed: stats.elapsed,
        });

        debug!(
            "Selected {} of {} files, pruned {} directories",
            stats.files_selected, stats.files_seen, stats.dirs_pruned
        );

        Ok(ScanResult {
            files,
            pruned_dirs,
            skipped_files,
            stats,
        })
    }

    fn dir_verdict(&self, path: &RelPath) -> DirVerdict {
        let decision = self.checker.decide(path, EntryKind::Directory);
        if decision.is_excluded() {
            DirVerdict::Prune(decision)
        } else {
            DirVerdict::Descend
        }
    }

    fn report_progress(&self, progress: &ScanProgress) {
        if let Some(callback) = &self.progress_callback {
            callback(progress);
        }
    }
}

/// Files and directories are walked; symlinks only when they point at a file
fn entry_kind(entry: &fs::DirEntry) -> Option<EntryKind> {
    let file_type = entry.file_type().ok()?;

    if file_type.is_dir() {
        Some(EntryKind::Directory)
    } else if file_type.is_file() {
        Some(EntryKind::File)
    } else if file_type.is_symlink() {
        match fs::metadata(entry.path()) {
            Ok(meta) if meta.is_file() => Some(EntryKind::File),
            _ => None,
        }
    } else {
        None
    }
}

/// Select files under `root`: the sorted relative paths to embed
pub fn select_files(
    root: &Path,
    rules: &IgnoreRules,
    excludes: &StaticExcludes,
) -> Result<Vec<RelPath>> {
    let checker = IgnoreChecker::new(rules, excludes);
    Ok(TreeSelector::new(root, checker)?.select()?.files)
}
