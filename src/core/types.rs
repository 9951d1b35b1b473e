//! Core data types for ctxpack

use serde::Serialize;
use std::fmt;
use std::path::{Component, Path};

/// A path relative to the project root, always `/`-separated
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct RelPath(String);

impl RelPath {
    /// The project root itself
    pub fn root() -> Self {
        Self(String::new())
    }

    /// Build from a path relative to the root, normalising separators.
    ///
    /// `.` components are dropped; returns `None` for paths that climb out of
    /// the root or are absolute.
    pub fn from_path(path: &Path) -> Option<Self> {
        let mut parts: Vec<String> = Vec::new();
        for component in path.components() {
            match component {
                Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
                Component::CurDir => {},
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
            }
        }
        Some(Self(parts.join("/")))
    }

    /// Build from a `/`-separated string as written in configuration
    pub fn from_config(raw: &str) -> Option<Self> {
        let trimmed = raw.trim().trim_matches('/');
        if trimmed.is_empty() {
            return None;
        }
        Self::from_path(Path::new(&trimmed.replace('\\', "/")))
    }

    /// Join a child name onto this path
    pub fn join(&self, name: &str) -> Self {
        if self.0.is_empty() {
            Self(name.to_string())
        } else {
            Self(format!("{}/{}", self.0, name))
        }
    }

    /// The final path segment
    pub fn basename(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// The path as a string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the root itself
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Resolve against the project root
    pub fn to_fs_path(&self, root: &Path) -> std::path::PathBuf {
        self.0
            .split('/')
            .filter(|part| !part.is_empty())
            .fold(root.to_path_buf(), |acc, part| acc.join(part))
    }

    /// Lowercased file extension, if any
    pub fn extension(&self) -> Option<String> {
        let name = self.basename();
        let dot = name.rfind('.')?;
        if dot == 0 || dot + 1 == name.len() {
            return None;
        }
        Some(name[dot + 1..].to_ascii_lowercase())
    }
}

impl fmt::Display for RelPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RelPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Kind of entry seen during traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

/// Fence language for a file embedded in the document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeLanguage {
    Python,
    Json,
    Markdown,
    Rust,
    Toml,
    Yaml,
    JavaScript,
    TypeScript,
    Bash,
    Html,
    Css,
    Text,
}

impl CodeLanguage {
    /// Pick the fence language from a path's extension
    pub fn for_path(path: &RelPath) -> Self {
        match path.extension().as_deref() {
            Some("py") => CodeLanguage::Python,
            Some("json") => CodeLanguage::Json,
            Some("md") => CodeLanguage::Markdown,
            Some("rs") => CodeLanguage::Rust,
            Some("toml") => CodeLanguage::Toml,
            Some("yaml") | Some("yml") => CodeLanguage::Yaml,
            Some("js") | Some("mjs") | Some("cjs") => CodeLanguage::JavaScript,
            Some("ts") | Some("tsx") => CodeLanguage::TypeScript,
            Some("sh") | Some("bash") => CodeLanguage::Bash,
            Some("html") | Some("htm") => CodeLanguage::Html,
            Some("css") => CodeLanguage::Css,
            _ => CodeLanguage::Text,
        }
    }

    /// Tag written after the opening fence
    pub fn fence_tag(&self) -> &'static str {
        match self {
            CodeLanguage::Python => "python",
            CodeLanguage::Json => "json",
            CodeLanguage::Markdown => "markdown",
            CodeLanguage::Rust => "rust",
            CodeLanguage::Toml => "toml",
            CodeLanguage::Yaml => "yaml",
            CodeLanguage::JavaScript => "javascript",
            CodeLanguage::TypeScript => "typescript",
            CodeLanguage::Bash => "bash",
            CodeLanguage::Html => "html",
            CodeLanguage::Css => "css",
            CodeLanguage::Text => "text",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rel_path_normalises_components() {
        let path = RelPath::from_path(Path::new("./src/./lib.rs")).unwrap();
        assert_eq!(path.as_str(), "src/lib.rs");
        assert_eq!(path.basename(), "lib.rs");
        assert!(RelPath::from_path(Path::new("../escape.txt")).is_none());
    }

    #[test]
    fn test_rel_path_from_config_trims_slashes() {
        assert_eq!(RelPath::from_config("/build/").unwrap().as_str(), "build");
        assert_eq!(
            RelPath::from_config("docs\\api").unwrap().as_str(),
            "docs/api"
        );
        assert!(RelPath::from_config("  ").is_none());
    }

    #[test]
    fn test_extension_and_language() {
        let py = RelPath::from_config("scripts/run.PY").unwrap();
        assert_eq!(py.extension().as_deref(), Some("py"));
        assert_eq!(CodeLanguage::for_path(&py).fence_tag(), "python");

        let dotfile = RelPath::from_config(".env").unwrap();
        assert_eq!(dotfile.extension(), None);
        assert_eq!(CodeLanguage::for_path(&dotfile), CodeLanguage::Text);

        let json = RelPath::from_config("package.json").unwrap();
        assert_eq!(CodeLanguage::for_path(&json).fence_tag(), "json");
        let md = RelPath::from_config("README.md").unwrap();
        assert_eq!(CodeLanguage::for_path(&md).fence_tag(), "markdown");
    }

    #[test]
    fn test_join_from_root() {
        let root = RelPath::root();
        let child = root.join("src").join("main.rs");
        assert_eq!(child.as_str(), "src/main.rs");
        assert!(root.is_root());
    }
}
