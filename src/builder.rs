//! Fluent builder API for sigmap.
//!
//! Walks a project, extracts signatures file by file and hands back the
//! populated tree, ready for [`crate::output::render`].

use std::path::{Path, PathBuf};

use glob::Pattern;
use tracing::{debug, info};

use crate::config::{IgnoreRules, ProjectConfig};
use crate::errors::SigmapError;
use crate::filter::detect_category;
use crate::signatures::{extract_file, SignatureEntry};
use crate::tree::FileNode;
use crate::walker::{build_tree, WalkOptions};

/// Builder for a project map.
///
/// # Examples
///
/// ```no_run
/// use sigmap::builder::SigMap;
/// use sigmap::output::{render, OutputOptions};
///
/// let map = SigMap::new("./project").include_hidden(false).build().unwrap();
/// print!("{}", render(&map.tree, &OutputOptions::default()).unwrap());
/// ```
pub struct SigMap {
    root: PathBuf,
    rules: Option<IgnoreRules>,
    walk_options: WalkOptions,
}

impl SigMap {
    /// Create a new builder for the given root path.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            rules: None,
            walk_options: WalkOptions::default(),
        }
    }

    /// Use these ignore rules instead of the defaults and `.sigmap.toml`.
    pub fn rules(mut self, rules: IgnoreRules) -> Self {
        self.rules = Some(rules);
        self
    }

    /// Descend into hidden directories.
    pub fn include_hidden(mut self, include: bool) -> Self {
        self.walk_options.include_hidden = include;
        self
    }

    /// Honour `.gitignore` files (default: true).
    pub fn respect_gitignore(mut self, respect: bool) -> Self {
        self.walk_options.respect_gitignore = respect;
        self
    }

    /// Set maximum directory depth.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.walk_options.max_depth = Some(depth);
        self
    }

    /// Leave out paths (relative to the root) matching this glob.
    pub fn exclude(mut self, pattern: Pattern) -> Self {
        self.walk_options.excludes.push(pattern);
        self
    }

    /// Walk the project and extract every code file's signatures.
    pub fn build(self) -> Result<ProjectMap, SigmapError> {
        if !self.root.exists() {
            return Err(SigmapError::PathNotFound(self.root));
        }

        let config = ProjectConfig::load(&self.root)?;
        let rules = self.rules.unwrap_or(config.rules);
        let walk_options = WalkOptions {
            rules,
            ..self.walk_options
        };

        let mut tree = build_tree(&self.root, &walk_options)?;
        info!(
            root = %self.root.display(),
            files = tree.file_count(),
            code_files = tree.code_file_count(),
            "walked project"
        );

        // One file at a time, in traversal order.
        tree.for_each_file_mut(&mut |file| {
            if let Some(category) = file.category() {
                let entries = extract_file(&file.path, category);
                file.set_signatures(entries);
            }
        });
        debug!(signatures = tree.signature_count(), "extraction finished");

        Ok(ProjectMap {
            root: self.root,
            output: config.output,
            tree,
        })
    }
}

/// Result of a map build.
#[derive(Debug)]
pub struct ProjectMap {
    /// Root as given to the builder.
    pub root: PathBuf,
    /// Output path configured in `.sigmap.toml`, relative to the root.
    pub output: Option<PathBuf>,
    /// Populated project tree.
    pub tree: FileNode,
}

impl ProjectMap {
    /// Project name shown in the map heading.
    pub fn name(&self) -> &str {
        &self.tree.name
    }

    pub fn code_file_count(&self) -> usize {
        self.tree.code_file_count()
    }

    pub fn signature_count(&self) -> usize {
        self.tree.signature_count()
    }
}

// ============================================================================
// Functional API
// ============================================================================

/// Build a map of `root` with default settings.
pub fn map_from_path(root: impl AsRef<Path>) -> Result<ProjectMap, SigmapError> {
    SigMap::new(root.as_ref()).build()
}

/// Signatures of a single file, dispatched on its extension.
///
/// Returns `None` when the extension is not recognized.
pub fn signatures_for(path: &Path) -> Option<Vec<SignatureEntry>> {
    detect_category(path).map(|category| extract_file(path, category))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_project() -> TempDir {
        let dir = TempDir::new().unwrap();

        fs::create_dir_all(dir.path().join("src")).unwrap();
        fs::write(
            dir.path().join("src/app.py"),
            r#"
class App:
    @staticmethod
    def create():
        pass

    def run(self):
        if self.ready:
            pass
"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("src/index.ts"),
            "export const main = () => {\n  if (x) {\n  }\n};\n",
        )
        .unwrap();
        fs::write(dir.path().join("notes.txt"), "plain").unwrap();

        dir
    }

    #[test]
    fn test_build_extracts_signatures() {
        let dir = create_test_project();

        let map = SigMap::new(dir.path()).build().unwrap();

        assert_eq!(map.tree.file_count(), 3);
        assert_eq!(map.code_file_count(), 2);
        // App, @staticmethod, create, run, main
        assert_eq!(map.signature_count(), 5);
    }

    #[test]
    fn test_build_missing_root() {
        let result = SigMap::new("/nonexistent/project").build();
        assert!(matches!(result, Err(SigmapError::PathNotFound(_))));
    }

    #[test]
    fn test_build_file_root() {
        let dir = create_test_project();
        let result = SigMap::new(dir.path().join("notes.txt")).build();
        assert!(matches!(result, Err(SigmapError::Walk(_))));
    }

    #[test]
    fn test_custom_rules_replace_defaults() {
        let dir = create_test_project();
        fs::create_dir_all(dir.path().join("node_modules")).unwrap();
        fs::write(dir.path().join("node_modules/dep.js"), "function dep() {\n").unwrap();

        let default_map = SigMap::new(dir.path()).build().unwrap();
        assert_eq!(default_map.tree.file_count(), 3);

        let map = SigMap::new(dir.path())
            .rules(IgnoreRules::empty().with_dirs(["src"]))
            .build()
            .unwrap();
        let names: Vec<_> = map.tree.children().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["node_modules", "notes.txt"]);
        assert_eq!(map.signature_count(), 1);
    }

    #[test]
    fn test_config_file_applies() {
        let dir = create_test_project();
        fs::write(
            dir.path().join(".sigmap.toml"),
            "ignore_dirs = [\"src\"]\noutput = \"MAP.md\"\n",
        )
        .unwrap();

        let map = SigMap::new(dir.path()).build().unwrap();
        assert_eq!(map.code_file_count(), 0);
        assert_eq!(map.output, Some(PathBuf::from("MAP.md")));
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let dir = create_test_project();
        fs::write(dir.path().join(".sigmap.toml"), "ignore_dirs = 3\n").unwrap();

        let result = SigMap::new(dir.path()).build();
        assert!(matches!(result, Err(SigmapError::Config(_))));
    }

    #[test]
    fn test_exclude_pattern() {
        let dir = create_test_project();
        let map = SigMap::new(dir.path())
            .exclude(Pattern::new("src/*.ts").unwrap())
            .build()
            .unwrap();
        assert_eq!(map.code_file_count(), 1);
    }

    #[test]
    fn test_functional_api() {
        let dir = create_test_project();

        let map = map_from_path(dir.path()).unwrap();
        assert!(map.tree.is_directory());
        assert_eq!(map.name(), dir.path().file_name().unwrap().to_string_lossy());

        let entries = signatures_for(&dir.path().join("src/index.ts")).unwrap();
        assert_eq!(entries[0].text, "export const main = () =>");
        assert!(signatures_for(&dir.path().join("notes.txt")).is_none());
    }
}
