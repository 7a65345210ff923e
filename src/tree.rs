//! In-memory project tree.
//!
//! Directories hold their children sorted by name; file nodes carry the
//! category they were dispatched to and, once extraction has run, their
//! signatures.

use std::path::{Component, Path, PathBuf};

use crate::filter::{detect_category, Category};
use crate::signatures::SignatureEntry;

/// The type of a tree node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Directory,
    File {
        /// `None` for files that are listed but not parsed.
        category: Option<Category>,
        signatures: Vec<SignatureEntry>,
    },
}

impl NodeKind {
    /// Check if this is a directory.
    pub fn is_directory(&self) -> bool {
        matches!(self, NodeKind::Directory)
    }

    /// Check if this is a file.
    pub fn is_file(&self) -> bool {
        matches!(self, NodeKind::File { .. })
    }
}

/// A node in the project tree.
#[derive(Debug, Clone)]
pub struct FileNode {
    /// File or directory name (not full path).
    pub name: String,
    /// Path as reached from the walk root.
    pub path: PathBuf,
    pub kind: NodeKind,
    children: Vec<FileNode>,
}

impl FileNode {
    /// Create a new directory node.
    pub fn directory(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            kind: NodeKind::Directory,
            children: Vec::new(),
        }
    }

    /// Create a file node; the category is detected from the path.
    pub fn file(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            name: name.into(),
            kind: NodeKind::File {
                category: detect_category(&path),
                signatures: Vec::new(),
            },
            path,
            children: Vec::new(),
        }
    }

    pub fn is_directory(&self) -> bool {
        self.kind.is_directory()
    }

    pub fn is_file(&self) -> bool {
        self.kind.is_file()
    }

    /// Category of a code file, `None` for directories and plain files.
    pub fn category(&self) -> Option<Category> {
        match &self.kind {
            NodeKind::File { category, .. } => *category,
            NodeKind::Directory => None,
        }
    }

    /// Whether this is a file that goes through signature extraction.
    pub fn is_code_file(&self) -> bool {
        self.category().is_some()
    }

    /// Extracted signatures (empty for directories and plain files).
    pub fn signatures(&self) -> &[SignatureEntry] {
        match &self.kind {
            NodeKind::File { signatures, .. } => signatures,
            NodeKind::Directory => &[],
        }
    }

    /// Store extraction results on a file node. Ignored for directories.
    pub fn set_signatures(&mut self, entries: Vec<SignatureEntry>) {
        if let NodeKind::File { signatures, .. } = &mut self.kind {
            *signatures = entries;
        }
    }

    /// Add a child node. Only valid for directories.
    pub fn add_child(&mut self, child: FileNode) {
        self.children.push(child);
    }

    /// Get child nodes.
    pub fn children(&self) -> &[FileNode] {
        &self.children
    }

    /// Child files, in order.
    pub fn files(&self) -> impl Iterator<Item = &FileNode> {
        self.children.iter().filter(|c| c.is_file())
    }

    /// Child directories, in order.
    pub fn directories(&self) -> impl Iterator<Item = &FileNode> {
        self.children.iter().filter(|c| c.is_directory())
    }

    /// Insert `node` at `relative` (a path below this directory), creating
    /// any missing intermediate directories.
    pub fn insert(&mut self, relative: &Path, node: FileNode) {
        let parents = relative
            .parent()
            .into_iter()
            .flat_map(|p| p.components())
            .filter_map(|c| match c {
                Component::Normal(name) => Some(name),
                _ => None,
            });

        let mut current = self;
        for raw in parents {
            // same naming as the walker: lossy for non-UTF-8 components
            let name = raw.to_string_lossy();
            let index = match current
                .children
                .iter()
                .position(|c| c.is_directory() && c.name == name)
            {
                Some(index) => index,
                None => {
                    let path = current.path.join(raw);
                    current.children.push(FileNode::directory(name, path));
                    current.children.len() - 1
                }
            };
            current = &mut current.children[index];
        }

        // the directory may already exist as an intermediate
        let exists = node.is_directory()
            && current
                .children
                .iter()
                .any(|c| c.is_directory() && c.name == node.name);
        if !exists {
            current.add_child(node);
        }
    }

    /// Sort children by name, recursively.
    pub fn sort_children(&mut self) {
        self.children.sort_by(|a, b| a.name.cmp(&b.name));
        for child in &mut self.children {
            child.sort_children();
        }
    }

    /// Visit every file node below (and including) this one.
    pub fn for_each_file_mut(&mut self, f: &mut impl FnMut(&mut FileNode)) {
        if self.is_file() {
            f(self);
            return;
        }
        for child in &mut self.children {
            child.for_each_file_mut(f);
        }
    }

    /// Count total files in this tree.
    pub fn file_count(&self) -> usize {
        match &self.kind {
            NodeKind::File { .. } => 1,
            NodeKind::Directory => self.children.iter().map(|c| c.file_count()).sum(),
        }
    }

    /// Count total directories in this tree, including this one.
    pub fn directory_count(&self) -> usize {
        match &self.kind {
            NodeKind::File { .. } => 0,
            NodeKind::Directory => {
                1 + self.children.iter().map(|c| c.directory_count()).sum::<usize>()
            }
        }
    }

    /// Count files that have a category.
    pub fn code_file_count(&self) -> usize {
        match &self.kind {
            NodeKind::File { category, .. } => usize::from(category.is_some()),
            NodeKind::Directory => self.children.iter().map(|c| c.code_file_count()).sum(),
        }
    }

    /// Count signature entries across the tree.
    pub fn signature_count(&self) -> usize {
        match &self.kind {
            NodeKind::File { signatures, .. } => signatures.len(),
            NodeKind::Directory => self.children.iter().map(|c| c.signature_count()).sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_node() {
        let node = FileNode::directory("src", "project/src");
        assert!(node.is_directory());
        assert!(!node.is_file());
        assert_eq!(node.category(), None);
        assert!(node.signatures().is_empty());
    }

    #[test]
    fn test_file_node_category() {
        let code = FileNode::file("main.py", "project/main.py");
        assert!(code.is_file());
        assert_eq!(code.category(), Some(Category::ScriptDynamic));
        assert!(code.is_code_file());

        let plain = FileNode::file("notes.txt", "project/notes.txt");
        assert_eq!(plain.category(), None);
        assert!(!plain.is_code_file());
    }

    #[test]
    fn test_set_signatures() {
        let mut node = FileNode::file("run.sh", "run.sh");
        node.set_signatures(vec![SignatureEntry::new("", "run() {")]);
        assert_eq!(node.signatures().len(), 1);

        let mut dir = FileNode::directory("d", "d");
        dir.set_signatures(vec![SignatureEntry::new("", "x")]);
        assert!(dir.signatures().is_empty());
    }

    #[test]
    fn test_insert_nested() {
        let mut root = FileNode::directory("root", "root");
        root.insert(Path::new("src"), FileNode::directory("src", "root/src"));
        root.insert(Path::new("src/a.py"), FileNode::file("a.py", "root/src/a.py"));
        root.insert(Path::new("lib/deep/b.ts"), FileNode::file("b.ts", "root/lib/deep/b.ts"));

        assert_eq!(root.file_count(), 2);
        assert_eq!(root.directory_count(), 4);
        let src = root.directories().find(|d| d.name == "src").unwrap();
        assert_eq!(src.files().count(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_insert_non_utf8_parent() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let raw = OsStr::from_bytes(b"caf\xe9");
        let name = raw.to_string_lossy().into_owned();
        let mut root = FileNode::directory("root", "root");
        root.insert(Path::new(raw), FileNode::directory(name.clone(), Path::new("root").join(raw)));
        root.insert(
            &Path::new(raw).join("menu.py"),
            FileNode::file("menu.py", Path::new("root").join(raw).join("menu.py")),
        );

        assert_eq!(root.children().len(), 1);
        assert!(root.files().next().is_none());
        let dir = root.directories().next().unwrap();
        assert_eq!(dir.name, name);
        assert_eq!(dir.files().next().unwrap().name, "menu.py");
    }

    #[test]
    fn test_insert_directory_twice_keeps_one() {
        let mut root = FileNode::directory("root", "root");
        root.insert(Path::new("a/x.py"), FileNode::file("x.py", "root/a/x.py"));
        root.insert(Path::new("a"), FileNode::directory("a", "root/a"));

        assert_eq!(root.children().len(), 1);
        assert_eq!(root.file_count(), 1);
    }

    #[test]
    fn test_sort_children() {
        let mut dir = FileNode::directory("src", "src");
        dir.add_child(FileNode::file("z.py", "src/z.py"));
        dir.add_child(FileNode::directory("utils", "src/utils"));
        dir.add_child(FileNode::file("B.py", "src/B.py"));
        dir.add_child(FileNode::file("a.py", "src/a.py"));

        dir.sort_children();

        let names: Vec<_> = dir.children().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["B.py", "a.py", "utils", "z.py"]);
        assert_eq!(dir.files().count(), 3);
        assert_eq!(dir.directories().count(), 1);
    }

    #[test]
    fn test_counts() {
        let mut root = FileNode::directory("root", "root");
        let mut a = FileNode::file("a.py", "root/a.py");
        a.set_signatures(vec![
            SignatureEntry::new("", "class A:"),
            SignatureEntry::new("    ", "def f(self):"),
        ]);
        root.add_child(a);

        let mut sub = FileNode::directory("sub", "root/sub");
        sub.add_child(FileNode::file("b.sh", "root/sub/b.sh"));
        sub.add_child(FileNode::file("c.md", "root/sub/c.md"));
        root.add_child(sub);

        assert_eq!(root.file_count(), 3);
        assert_eq!(root.code_file_count(), 2);
        assert_eq!(root.signature_count(), 2);
    }

    #[test]
    fn test_for_each_file_mut() {
        let mut root = FileNode::directory("root", "root");
        root.insert(Path::new("a.py"), FileNode::file("a.py", "root/a.py"));
        root.insert(Path::new("d/b.sh"), FileNode::file("b.sh", "root/d/b.sh"));

        let mut seen = Vec::new();
        root.for_each_file_mut(&mut |f| seen.push(f.name.clone()));
        seen.sort();
        assert_eq!(seen, vec!["a.py", "b.sh"]);
    }
}
