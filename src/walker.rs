//! Directory traversal.
//!
//! Uses the `ignore` crate to walk a project in a stable, name-sorted order.
//! Pruning happens during the walk, so ignored directories are never
//! descended into:
//!
//! - directory and file names from [`IgnoreRules`]
//! - hidden directories (hidden *files* are still listed)
//! - `.gitignore` and friends, when enabled
//! - `.sigmapignore` files, always
//! - `--exclude` globs, matched against the path relative to the root

use std::path::{Path, PathBuf};

use glob::Pattern;
use ignore::WalkBuilder;
use thiserror::Error;
use tracing::warn;

use crate::config::{IgnoreRules, IGNORE_FILE_NAME};
use crate::tree::FileNode;

/// Errors that can occur during directory walking.
#[derive(Debug, Error)]
pub enum WalkError {
    #[error("path not found: {path}")]
    NotFound { path: PathBuf },

    #[error("not a directory: {path}")]
    NotADirectory { path: PathBuf },

    #[error("permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("symlink loop detected: {path}")]
    SymlinkLoop { path: PathBuf },
}

/// Options for directory walking.
#[derive(Debug, Clone)]
pub struct WalkOptions {
    /// Maximum depth to recurse (None = unlimited).
    pub max_depth: Option<usize>,
    /// Follow symbolic links.
    pub follow_symlinks: bool,
    /// Descend into directories whose name starts with a dot.
    pub include_hidden: bool,
    /// Respect .gitignore, .git/info/exclude and the global gitignore.
    pub respect_gitignore: bool,
    /// Name-based ignore lists.
    pub rules: IgnoreRules,
    /// Glob patterns matched against root-relative paths.
    pub excludes: Vec<Pattern>,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            max_depth: None,
            follow_symlinks: false,
            include_hidden: false,
            respect_gitignore: true,
            rules: IgnoreRules::default(),
            excludes: Vec::new(),
        }
    }
}

impl WalkOptions {
    /// Set maximum depth.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }
}

/// Entry from a directory walk.
#[derive(Debug, Clone)]
pub struct WalkEntry {
    /// Path to the entry, as reached from the root.
    pub path: PathBuf,
    /// Path relative to the walk root (empty for the root itself).
    pub relative: PathBuf,
    /// Depth from root (root = 0).
    pub depth: usize,
    /// Whether this is a file (anything that is not a directory).
    pub is_file: bool,
}

/// Iterator over the entries of a project.
pub struct Walk {
    root: PathBuf,
    inner: ignore::Walk,
}

impl Iterator for Walk {
    type Item = Result<WalkEntry, WalkError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.inner.next()? {
                Ok(entry) => {
                    let path = entry.path().to_path_buf();
                    let relative = path
                        .strip_prefix(&self.root)
                        .map(Path::to_path_buf)
                        .unwrap_or_default();
                    let is_file = !entry.file_type().is_some_and(|ft| ft.is_dir());
                    return Some(Ok(WalkEntry {
                        path,
                        relative,
                        depth: entry.depth(),
                        is_file,
                    }));
                }
                Err(err) => {
                    // Non-IO errors (bad ignore-file globs and the like) are skipped.
                    if let Some(err) = convert_error(err, self.root.clone()) {
                        return Some(Err(err));
                    }
                }
            }
        }
    }
}

fn convert_error(err: ignore::Error, path: PathBuf) -> Option<WalkError> {
    match err {
        ignore::Error::WithPath { path, err } => convert_error(*err, path),
        ignore::Error::WithDepth { err, .. } | ignore::Error::WithLineNumber { err, .. } => {
            convert_error(*err, path)
        }
        ignore::Error::Loop { child, .. } => Some(WalkError::SymlinkLoop { path: child }),
        ignore::Error::Io(source) if source.kind() == std::io::ErrorKind::PermissionDenied => {
            Some(WalkError::PermissionDenied { path })
        }
        ignore::Error::Io(source) => Some(WalkError::Io { path, source }),
        _ => None,
    }
}

/// Walk a project directory.
///
/// # Examples
///
/// ```no_run
/// use sigmap::walker::{walk, WalkOptions};
/// use std::path::Path;
///
/// for entry in walk(Path::new("."), &WalkOptions::default()).unwrap().flatten() {
///     println!("{}", entry.relative.display());
/// }
/// ```
pub fn walk(root: &Path, options: &WalkOptions) -> Result<Walk, WalkError> {
    if !root.exists() {
        return Err(WalkError::NotFound {
            path: root.to_path_buf(),
        });
    }
    if !root.is_dir() {
        return Err(WalkError::NotADirectory {
            path: root.to_path_buf(),
        });
    }

    let mut builder = WalkBuilder::new(root);
    builder
        .hidden(false)
        .git_ignore(options.respect_gitignore)
        .git_global(options.respect_gitignore)
        .git_exclude(options.respect_gitignore)
        .parents(options.respect_gitignore)
        .follow_links(options.follow_symlinks)
        .max_depth(options.max_depth)
        .add_custom_ignore_filename(IGNORE_FILE_NAME)
        .sort_by_file_name(|a, b| a.cmp(b));

    let rules = options.rules.clone();
    let excludes = options.excludes.clone();
    let include_hidden = options.include_hidden;
    let prefix = root.to_path_buf();
    builder.filter_entry(move |entry| {
        if entry.depth() == 0 {
            return true;
        }

        let name = entry.file_name().to_string_lossy();
        let is_dir = entry.file_type().is_some_and(|ft| ft.is_dir());
        let ignored = if is_dir {
            rules.ignores_dir(&name) || (!include_hidden && name.starts_with('.'))
        } else {
            rules.ignores_file(&name)
        };
        if ignored {
            return false;
        }

        let relative = entry.path().strip_prefix(&prefix).unwrap_or(entry.path());
        !excludes.iter().any(|p| p.matches_path(relative))
    });

    Ok(Walk {
        root: root.to_path_buf(),
        inner: builder.build(),
    })
}

/// Build the directory tree of a project.
///
/// Entries that fail to read are logged and left out.
pub fn build_tree(root: &Path, options: &WalkOptions) -> Result<FileNode, WalkError> {
    let name = root_name(root);
    let mut tree = FileNode::directory(name, root);

    for entry in walk(root, options)? {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!(error = %err, "skipping unreadable entry");
                continue;
            }
        };
        if entry.depth == 0 {
            continue;
        }

        let name = entry
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let node = if entry.is_file {
            FileNode::file(name, &entry.path)
        } else {
            FileNode::directory(name, &entry.path)
        };
        tree.insert(&entry.relative, node);
    }

    tree.sort_children();
    Ok(tree)
}

/// Display name of a root directory; `.` resolves to the real directory name.
pub fn root_name(root: &Path) -> String {
    root.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .or_else(|| {
            root.canonicalize()
                .ok()
                .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        })
        .unwrap_or_else(|| root.display().to_string())
}
