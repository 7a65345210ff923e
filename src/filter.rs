//! Category dispatch for source files.
//!
//! Maps a file extension to the [`Category`] whose rule set extracts its
//! signatures. Anything unrecognized is skipped: it still shows up in the
//! project map, just without a signature block.

use std::path::Path;

use serde::Serialize;
use thiserror::Error;

/// Errors from category lookup.
#[derive(Debug, Error)]
pub enum FilterError {
    #[error("unknown category: {0} (expected one of: script-dynamic, curly-brace, shell)")]
    UnknownCategory(String),
}

/// Language family that decides which rule set and guard apply to a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    /// Indentation-scoped scripts with decorators (Python).
    ScriptDynamic,
    /// JavaScript/TypeScript family.
    CurlyBrace,
    /// POSIX-style shell scripts.
    Shell,
}

impl Category {
    /// All supported categories.
    pub fn all() -> &'static [Category] {
        &[Category::ScriptDynamic, Category::CurlyBrace, Category::Shell]
    }

    /// File extensions (without the dot) dispatched to this category.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Category::ScriptDynamic => &["py"],
            Category::CurlyBrace => &["js", "jsx", "ts", "tsx"],
            Category::Shell => &["sh"],
        }
    }

    /// Map an extension to its category. Case-insensitive, leading dot optional.
    ///
    /// ```
    /// use sigmap::filter::Category;
    ///
    /// assert_eq!(Category::from_extension(".TSX"), Some(Category::CurlyBrace));
    /// assert_eq!(Category::from_extension("md"), None);
    /// ```
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.strip_prefix('.').unwrap_or(ext).to_ascii_lowercase();
        Category::all()
            .iter()
            .copied()
            .find(|c| c.extensions().contains(&ext.as_str()))
    }

    /// Line-comment marker used when rendering diagnostics for this category.
    pub fn comment_marker(&self) -> &'static str {
        match self {
            Category::CurlyBrace => "//",
            Category::ScriptDynamic | Category::Shell => "#",
        }
    }

    /// Stable name used on the command line and in JSON output.
    pub fn name(&self) -> &'static str {
        match self {
            Category::ScriptDynamic => "script-dynamic",
            Category::CurlyBrace => "curly-brace",
            Category::Shell => "shell",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Category {
    type Err = FilterError;

    /// Accepts a category name or any of its extensions.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        Category::all()
            .iter()
            .copied()
            .find(|c| c.name() == lower)
            .or_else(|| Category::from_extension(&lower))
            .ok_or_else(|| FilterError::UnknownCategory(s.to_string()))
    }
}

/// Lowercased final extension of a path, if any.
pub fn file_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

/// Detect the category of a file from its extension.
pub fn detect_category(path: &Path) -> Option<Category> {
    file_extension(path).and_then(|ext| Category::from_extension(&ext))
}
