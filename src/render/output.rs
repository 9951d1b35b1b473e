//! Writing the document within a character budget

use crate::core::error::{ContextError, Result};
use crate::render::document::Document;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// How an oversized document is handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverflowMode {
    /// Write numbered parts, each within the limit
    Split,
    /// Cut the document and append a notice
    Truncate,
}

/// What was written
#[derive(Debug, Clone)]
pub struct OutputReport {
    pub files: Vec<PathBuf>,
    pub total_chars: usize,
    pub written_chars: usize,
    pub truncated: bool,
}

/// Pack sections into parts of at most `max_chars` characters.
///
/// Sections are kept whole where they fit; a section larger than the limit
/// is cut on character boundaries. The parts concatenate to the document.
pub fn split_document(document: &Document, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for section in document.sections() {
        let len = section.chars().count();

        if current_len + len <= max_chars {
            current.push_str(section);
            current_len += len;
            continue;
        }

        if !current.is_empty() {
            parts.push(std::mem::take(&mut current));
            current_len = 0;
        }

        if len <= max_chars {
            current.push_str(section);
            current_len = len;
            continue;
        }

        for chunk in chunk_chars(section, max_chars) {
            let chunk_len = chunk.chars().count();
            if chunk_len == max_chars {
                parts.push(chunk);
            } else {
                current = chunk;
                current_len = chunk_len;
            }
        }
    }

    if !current.is_empty() || parts.is_empty() {
        parts.push(current);
    }
    parts
}

/// Cut `text` to at most `max_chars` characters, ending with a notice
pub fn truncate_document(text: &str, max_chars: usize) -> String {
    let total = text.chars().count();
    if total <= max_chars {
        return text.to_string();
    }

    let notice = format!(
        "\n\n---\n\n**[Output truncated: the document has {} characters, the limit is {}.]**\n",
        total, max_chars
    );
    let notice_len = notice.chars().count();
    if notice_len >= max_chars {
        return text.chars().take(max_chars).collect();
    }

    let mut out: String = text.chars().take(max_chars - notice_len).collect();
    out.push_str(&notice);
    out
}

/// File name for part `index` (1-based) of `output`
pub fn part_path(output: &Path, index: usize) -> PathBuf {
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match output.extension() {
        Some(ext) => format!("{}_part{}.{}", stem, index, ext.to_string_lossy()),
        None => format!("{}_part{}", stem, index),
    };
    output.with_file_name(name)
}

/// Whether `name` is a split part (`<stem>_part<N>.<ext>`) of `output_name`
pub fn is_part_name(output_name: &str, name: &str) -> bool {
    let (stem, ext) = match output_name.rfind('.') {
        Some(dot) if dot > 0 => (&output_name[..dot], &output_name[dot..]),
        _ => (output_name, ""),
    };

    name.strip_prefix(stem)
        .and_then(|rest| rest.strip_prefix("_part"))
        .and_then(|rest| rest.strip_suffix(ext))
        .map(|digits| !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()))
        .unwrap_or(false)
}

/// Remove split parts left by earlier runs, and the single file too if asked
fn clear_previous_output(output: &Path, remove_single: bool) -> Result<()> {
    let Some(output_name) = output.file_name().and_then(|n| n.to_str()) else {
        return Ok(());
    };
    let dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let entries = fs::read_dir(dir).map_err(|e| ContextError::output_write(dir.to_path_buf(), e))?;
    for entry in entries {
        let entry = entry.map_err(|e| ContextError::output_write(dir.to_path_buf(), e))?;
        let is_part = entry
            .file_name()
            .to_str()
            .map(|name| is_part_name(output_name, name))
            .unwrap_or(false);
        if is_part && entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
            remove_file(&entry.path())?;
        }
    }

    if remove_single && output.is_file() {
        remove_file(output)?;
    }
    Ok(())
}

fn remove_file(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => {
            debug!("Removed previous output {}", path.display());
            Ok(())
        },
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(ContextError::output_write(path.to_path_buf(), e)),
    }
}

/// Write `document` to `output`, splitting or truncating past `max_chars`.
///
/// Output from an earlier run (the single file or any split parts) is
/// removed first, so what is on disk always matches this document.
pub fn write_document(
    document: &Document,
    output: &Path,
    max_chars: usize,
    mode: OverflowMode,
) -> Result<OutputReport> {
    let total_chars = document.char_len();

    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent).map_err(|e| ContextError::output_write(parent.to_path_buf(), e))?;
    }

    let splitting = total_chars > max_chars && mode == OverflowMode::Split;
    clear_previous_output(output, splitting)?;

    if total_chars <= max_chars {
        write_file(output, &document.to_markdown())?;
        info!("Wrote {} characters to {}", total_chars, output.display());
        return Ok(OutputReport {
            files: vec![output.to_path_buf()],
            total_chars,
            written_chars: total_chars,
            truncated: false,
        });
    }

    match mode {
        OverflowMode::Split => {
            let parts = split_document(document, max_chars);
            let mut files = Vec::with_capacity(parts.len());
            for (index, part) in parts.iter().enumerate() {
                let path = part_path(output, index + 1);
                write_file(&path, part)?;
                files.push(path);
            }
            info!(
                "Split {} characters into {} parts next to {}",
                total_chars,
                files.len(),
                output.display()
            );
            Ok(OutputReport {
                files,
                total_chars,
                written_chars: total_chars,
                truncated: false,
            })
        },
        OverflowMode::Truncate => {
            let text = truncate_document(&document.to_markdown(), max_chars);
            let written_chars = text.chars().count();
            write_file(output, &text)?;
            info!(
                "Truncated {} characters to {} in {}",
                total_chars,
                written_chars,
                output.display()
            );
            Ok(OutputReport {
                files: vec![output.to_path_buf()],
                total_chars,
                written_chars,
                truncated: true,
            })
        },
    }
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).map_err(|e| ContextError::output_write(path.to_path_buf(), e))
}

fn chunk_chars(text: &str, size: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut count = 0;
    for ch in text.chars() {
        current.push(ch);
        count += 1;
        if count == size {
            chunks.push(std::mem::take(&mut current));
            count = 0;
        }
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}
