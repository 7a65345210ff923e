//! Project configuration.
//!
//! [`IgnoreRules`] is an immutable value handed to the walker when a map is
//! built. Defaults cover the usual build output, dependency and asset noise;
//! a `.sigmap.toml` in the project root can extend them:
//!
//! ```toml
//! ignore_dirs = ["fixtures", "vendor"]
//! ignore_files = ["schema.generated.ts"]
//! ignore_extensions = [".pb.go"]
//! output = "docs/PROJECT_MAP.md"
//! ```

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Config file read from the project root.
pub const CONFIG_FILE_NAME: &str = ".sigmap.toml";

/// Gitignore-syntax file read from the project root.
pub const IGNORE_FILE_NAME: &str = ".sigmapignore";

/// Default name of the generated map, relative to the project root.
pub const DEFAULT_OUTPUT_FILE: &str = "PROJECT_MAP.md";

const DEFAULT_IGNORE_DIRS: &[&str] = &[
    "node_modules",
    "venv",
    ".git",
    "__pycache__",
    "dist",
    "build",
    ".next",
    "coverage",
    ".cursor",
    ".vscode",
    "logs",
    "uploads",
    "data",
    ".gemini",
];

const DEFAULT_IGNORE_SUFFIXES: &[&str] = &[
    ".png", ".svg", ".ico", ".jpg", ".jpeg", ".gif", ".webp", // images
    ".woff", ".woff2", ".ttf", ".eot", // fonts
    ".map", ".min.js", ".min.css", ".lock",
];

const DEFAULT_IGNORE_FILES: &[&str] = &[
    "package-lock.json",
    "yarn.lock",
    "pnpm-lock.yaml",
    ".DS_Store",
    "Thumbs.db",
];

/// Errors while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Names and suffixes excluded from the map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnoreRules {
    dirs: BTreeSet<String>,
    files: BTreeSet<String>,
    suffixes: BTreeSet<String>,
}

impl Default for IgnoreRules {
    fn default() -> Self {
        Self {
            dirs: DEFAULT_IGNORE_DIRS.iter().map(|s| s.to_string()).collect(),
            files: DEFAULT_IGNORE_FILES.iter().map(|s| s.to_string()).collect(),
            suffixes: DEFAULT_IGNORE_SUFFIXES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl IgnoreRules {
    /// Rules that ignore nothing.
    pub fn empty() -> Self {
        Self {
            dirs: BTreeSet::new(),
            files: BTreeSet::new(),
            suffixes: BTreeSet::new(),
        }
    }

    /// Add directory names to skip (the directory and everything under it).
    pub fn with_dirs<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dirs.extend(names.into_iter().map(Into::into));
        self
    }

    /// Add exact file names to skip.
    pub fn with_files<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.files.extend(names.into_iter().map(Into::into));
        self
    }

    /// Add file name suffixes to skip (`.png`, `.min.js`).
    pub fn with_suffixes<I, S>(mut self, suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.suffixes.extend(suffixes.into_iter().map(Into::into));
        self
    }

    /// Whether a directory with this name is pruned.
    pub fn ignores_dir(&self, name: &str) -> bool {
        self.dirs.contains(name)
    }

    /// Whether a file with this name is left out of the map.
    ///
    /// Anything with `.min.` in its name counts as minified and is skipped.
    pub fn ignores_file(&self, name: &str) -> bool {
        self.files.contains(name)
            || self.suffixes.iter().any(|s| name.ends_with(s.as_str()))
            || name.contains(".min.")
    }
}

/// Contents of `.sigmap.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub ignore_dirs: Vec<String>,
    pub ignore_files: Vec<String>,
    pub ignore_extensions: Vec<String>,
    pub output: Option<PathBuf>,
}

/// Effective configuration for one project root.
#[derive(Debug, Clone, Default)]
pub struct ProjectConfig {
    pub rules: IgnoreRules,
    /// Output path from the config file, relative to the project root.
    pub output: Option<PathBuf>,
}

impl ProjectConfig {
    /// Load `.sigmap.toml` from `root`, layered over the defaults.
    ///
    /// A missing file is not an error.
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let path = root.join(CONFIG_FILE_NAME);
        if !path.is_file() {
            return Ok(Self::default());
        }

        debug!(path = %path.display(), "loading config");
        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        let file: ConfigFile =
            toml::from_str(&content).map_err(|source| ConfigError::Parse { path, source })?;

        Ok(Self::from_file(file))
    }

    /// Layer a parsed config file over the default rules.
    pub fn from_file(file: ConfigFile) -> Self {
        let rules = IgnoreRules::default()
            .with_dirs(file.ignore_dirs)
            .with_files(file.ignore_files)
            .with_suffixes(file.ignore_extensions);

        Self {
            rules,
            output: file.output,
        }
    }
}
