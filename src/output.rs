//! Project map rendering.
//!
//! Turns a project tree into the Markdown map (default) or JSON. Directories
//! are written depth-first: each directory's heading, then its files, then
//! its subdirectories.

use std::path::Path;

use serde::Serialize;
use thiserror::Error;

use crate::filter::Category;
use crate::signatures::SignatureEntry;
use crate::tree::FileNode;

/// Errors that can occur during output formatting.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("failed to write {path}: {source}")]
    Write {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Timestamp layout of the `Generated` line.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const FENCE: &str = "```";
const NO_SIGNATURES: &str = "*(no signatures found)*";

/// Output format selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Markdown project map (default).
    #[default]
    Markdown,
    /// JSON for programmatic access.
    Json,
}

/// Options controlling the rendered document.
#[derive(Debug, Clone, Default)]
pub struct OutputOptions {
    pub format: OutputFormat,
    /// Value of the `Generated` line; omitted when `None`.
    pub generated: Option<String>,
}

impl OutputOptions {
    /// Options stamped with the current local time.
    pub fn stamped(format: OutputFormat) -> Self {
        Self {
            format,
            generated: Some(chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()),
        }
    }
}

/// Render a project tree.
pub fn render(tree: &FileNode, options: &OutputOptions) -> Result<String, OutputError> {
    match options.format {
        OutputFormat::Markdown => Ok(render_markdown(tree, options)),
        OutputFormat::Json => render_json(tree, options),
    }
}

// ============================================================================
// Markdown
// ============================================================================

fn render_markdown(tree: &FileNode, options: &OutputOptions) -> String {
    let mut output = String::with_capacity(8192);

    output.push_str(&format!("# 🗺️ PROJECT MAP: {}\n\n", tree.name));
    if let Some(generated) = &options.generated {
        output.push_str(&format!("**Generated:** {}\n\n", generated));
    }
    output.push_str(
        "> **Note:** This map shows the project structure and code signatures (classes, functions, methods).\n",
    );
    output.push_str("> Run `sigmap generate` to regenerate after significant changes.\n\n");
    output.push_str("---\n\n");

    write_directory(&mut output, tree, 0);
    output
}

fn write_directory(output: &mut String, dir: &FileNode, depth: usize) {
    if depth == 0 {
        output.push_str("## 📁 / (root)\n");
    } else {
        output.push_str(&format!("{}### 📁 {}/\n", "  ".repeat(depth - 1), dir.name));
    }

    let indent = "  ".repeat(depth);
    for file in dir.files() {
        write_file(output, file, &indent);
    }
    output.push('\n');

    for sub in dir.directories() {
        write_directory(output, sub, depth + 1);
    }
}

fn write_file(output: &mut String, file: &FileNode, indent: &str) {
    if !file.is_code_file() {
        output.push_str(&format!("{indent}- 📄 {}\n", file.name));
        return;
    }

    output.push_str(&format!("{indent}#### 📄 {}\n", file.name));
    let signatures = file.signatures();
    if signatures.is_empty() {
        output.push_str(&format!("{indent}{NO_SIGNATURES}\n"));
        return;
    }

    output.push_str(&format!("{indent}{FENCE}\n"));
    for entry in signatures {
        output.push_str(&format!("{indent}{entry}\n"));
    }
    output.push_str(&format!("{indent}{FENCE}\n"));
}

// ============================================================================
// JSON
// ============================================================================

#[derive(Serialize)]
struct JsonMap<'a> {
    project: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    generated: Option<&'a str>,
    root: JsonDirectory<'a>,
}

#[derive(Serialize)]
struct JsonDirectory<'a> {
    name: &'a str,
    path: String,
    files: Vec<JsonFile<'a>>,
    directories: Vec<JsonDirectory<'a>>,
}

#[derive(Serialize)]
struct JsonFile<'a> {
    name: &'a str,
    path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<Category>,
    #[serde(skip_serializing_if = "Option::is_none")]
    signatures: Option<&'a [SignatureEntry]>,
}

fn render_json(tree: &FileNode, options: &OutputOptions) -> Result<String, OutputError> {
    let map = JsonMap {
        project: &tree.name,
        generated: options.generated.as_deref(),
        root: directory_to_json(tree, &tree.path),
    };
    let mut json = serde_json::to_string_pretty(&map)?;
    json.push('\n');
    Ok(json)
}

fn relative_display(path: &Path, root: &Path) -> String {
    path.strip_prefix(root).unwrap_or(path).display().to_string()
}

fn directory_to_json<'a>(dir: &'a FileNode, root: &Path) -> JsonDirectory<'a> {
    JsonDirectory {
        name: &dir.name,
        path: relative_display(&dir.path, root),
        files: dir
            .files()
            .map(|file| {
                let category = file.category();
                JsonFile {
                    name: &file.name,
                    path: relative_display(&file.path, root),
                    category,
                    signatures: category.map(|_| file.signatures()),
                }
            })
            .collect(),
        directories: dir
            .directories()
            .map(|sub| directory_to_json(sub, root))
            .collect(),
    }
}
