//! Ignore-file parser: compiles gitignore-style lines into ordered rules
//!
//! The dialect is a deliberate simplification of gitignore:
//!
//! - `*` and `?` may match across `/`
//! - a pattern without `/` matches the basename at any depth
//! - a leading `/` (or any interior `/`) anchors the pattern at the root
//! - a trailing `/` matches the named path and everything below it
//! - `!` negates; the last matching rule wins

use crate::core::error::{ContextError, Result};
use crate::core::types::RelPath;
use regex::Regex;
use std::borrow::Cow;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, warn};

/// A single compiled rule from an ignore file
#[derive(Debug, Clone)]
pub struct IgnoreRule {
    /// The line as written (after trimming)
    pub original: String,
    /// Compiled matcher, anchored at both ends
    pub pattern: Regex,
    /// Whether a match re-includes the path
    pub negated: bool,
    /// Pattern had no `/`, so the basename is also tested
    pub bare: bool,
    /// Pattern ended with `/`
    pub directory: bool,
}

impl IgnoreRule {
    /// Whether this rule applies to `path`
    pub fn matches(&self, path: &RelPath) -> bool {
        if self.pattern.is_match(path.as_str()) {
            return true;
        }
        self.bare && self.pattern.is_match(path.basename())
    }
}

/// Ordered set of rules parsed from one ignore file
#[derive(Debug, Clone, Default)]
pub struct IgnoreRules {
    rules: Vec<IgnoreRule>,
}

impl IgnoreRules {
    /// An empty rule set; nothing is ignored
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load rules from an ignore file.
    ///
    /// A missing file yields an empty set. An unreadable file is logged and
    /// also yields an empty set; invalid UTF-8 is decoded lossily.
    pub fn from_file(path: &Path) -> Self {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No ignore file at {}, nothing ignored by pattern", path.display());
                return Self::empty();
            },
            Err(e) => {
                warn!("Cannot read ignore file {}: {}", path.display(), e);
                return Self::empty();
            },
        };

        let content = String::from_utf8_lossy(&bytes);
        if matches!(content, Cow::Owned(_)) {
            warn!("Ignore file {} is not valid UTF-8, decoding lossily", path.display());
        }

        let rules = Self::from_content(&content);
        debug!(
            "Loaded {} ignore rules from {}",
            rules.len(),
            path.display()
        );
        rules
    }

    /// Parse rules from ignore-file content
    pub fn from_content(content: &str) -> Self {
        Self::from_lines(content.lines())
    }

    /// Parse rules from individual lines, preserving order
    pub fn from_lines<'a, I>(lines: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut rules = Vec::new();

        for (line_num, line) in lines.into_iter().enumerate() {
            match parse_line(line) {
                Ok(Some(rule)) => rules.push(rule),
                Ok(None) => {},
                Err(e) => {
                    warn!("Skipping invalid ignore pattern on line {}: {}", line_num + 1, e);
                },
            }
        }

        Self { rules }
    }

    /// Whether `path` is ignored, last matching rule wins
    pub fn is_ignored(&self, path: &RelPath) -> bool {
        self.last_match(path).map(|rule| !rule.negated).unwrap_or(false)
    }

    /// The rule that decides `path`, if any rule matches
    pub fn last_match(&self, path: &RelPath) -> Option<&IgnoreRule> {
        let mut decided = None;
        for rule in &self.rules {
            if rule.matches(path) {
                decided = Some(rule);
            }
        }
        decided
    }

    /// Whether some ignoring rule matched before the deciding negation
    pub fn ignored_before(&self, path: &RelPath, decider: &IgnoreRule) -> bool {
        self.rules
            .iter()
            .take_while(|rule| !std::ptr::eq(*rule, decider))
            .any(|rule| !rule.negated && rule.matches(path))
    }

    /// All rules in file order
    pub fn rules(&self) -> &[IgnoreRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Parse one ignore-file line. Blank lines and comments yield `None`.
fn parse_line(line: &str) -> Result<Option<IgnoreRule>> {
    let line = line.trim();

    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    match compile(line) {
        Ok(rule) => Ok(Some(rule)),
        Err(ContextError::EmptyPattern { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Compile a single pattern line into a rule.
///
/// Pure: the same input always produces an equivalent matcher.
pub fn compile(line: &str) -> Result<IgnoreRule> {
    let (negated, body) = match line.strip_prefix('!') {
        Some(rest) => (true, rest),
        None => (false, line),
    };

    let directory = body.ends_with('/');
    let body = body.trim_end_matches('/');

    let (anchored, body) = match body.strip_prefix('/') {
        Some(rest) => (true, rest),
        None => (false, body),
    };

    if body.is_empty() {
        return Err(ContextError::EmptyPattern {
            line: line.to_string(),
        });
    }

    let bare = !anchored && !body.contains('/');

    let mut expr = String::with_capacity(body.len() * 2 + 16);
    expr.push_str(if bare { "(?:^|/)" } else { "^" });
    expr.push_str(&glob_to_regex(body));
    if directory {
        expr.push_str("(?:/.*)?");
    }
    expr.push('$');

    let pattern = Regex::new(&expr).map_err(|e| ContextError::invalid_pattern(line, e))?;

    Ok(IgnoreRule {
        original: line.to_string(),
        pattern,
        negated,
        bare,
        directory,
    })
}

/// Escape everything except the `*` and `?` wildcards
fn glob_to_regex(glob: &str) -> String {
    let mut out = String::with_capacity(glob.len() * 2);
    let mut literal = String::new();

    for ch in glob.chars() {
        match ch {
            '*' | '?' => {
                out.push_str(&regex::escape(&literal));
                literal.clear();
                out.push_str(if ch == '*' { ".*" } else { "." });
            },
            _ => literal.push(ch),
        }
    }
    out.push_str(&regex::escape(&literal));

    out
}
