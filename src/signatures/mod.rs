//! Signature extraction.
//!
//! Extracts declaration headers (classes, functions, methods, interfaces,
//! type aliases, shell functions) from source files line by line, dropping
//! bodies and control flow. Each category has its own rule set:
//!
//! - [`python`] - class/def headers plus decorator aggregation
//! - [`javascript`] - JS/TS headers behind the control-flow [`guard`]
//! - [`shell`] - the two shell function forms
//!
//! Matching is single-line. A header whose parameter list closes on a later
//! line is not detected.

pub mod guard;
pub mod javascript;
pub mod python;
pub mod shell;

use std::path::Path;

use serde::Serialize;
use tracing::{debug, trace};

use crate::filter::Category;

/// What a matched line declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationKind {
    Class,
    Function,
    /// Bare `name(args) {` inside a class or object body.
    Method,
    Interface,
    TypeAlias,
    Decorator,
    ShellFunction,
}

impl std::fmt::Display for DeclarationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DeclarationKind::Class => "class",
            DeclarationKind::Function => "function",
            DeclarationKind::Method => "method",
            DeclarationKind::Interface => "interface",
            DeclarationKind::TypeAlias => "type",
            DeclarationKind::Decorator => "decorator",
            DeclarationKind::ShellFunction => "shell function",
        };
        f.write_str(name)
    }
}

/// One line of a file, split once into indent, body and first token.
///
/// The guard and every classifier read the same split, so they always agree
/// on where the indent ends and what the first token is.
#[derive(Debug, Clone, Copy)]
pub struct SourceLine<'a> {
    /// Zero-based line number.
    pub number: usize,
    /// Full line text without the line terminator.
    pub text: &'a str,
    /// Leading whitespace, verbatim.
    pub indent: &'a str,
    body: &'a str,
    first_token: &'a str,
}

impl<'a> SourceLine<'a> {
    pub fn new(number: usize, text: &'a str) -> Self {
        let body = text.trim_start();
        let indent = &text[..text.len() - body.len()];
        let head = body.trim_end();
        let end = head
            .find(|c: char| c == '(' || c.is_whitespace())
            .unwrap_or(head.len());

        Self {
            number,
            text,
            indent,
            body,
            first_token: &head[..end],
        }
    }

    /// Text after the indent.
    pub fn body(&self) -> &'a str {
        self.body
    }

    /// Text up to the first `(` or whitespace after the indent.
    pub fn first_token(&self) -> &'a str {
        self.first_token
    }

    /// Whether the line has any leading whitespace.
    pub fn is_indented(&self) -> bool {
        !self.indent.is_empty()
    }
}

/// Split file content into source lines.
///
/// `\n`, `\r\n` and a lone `\r` all end a line. A terminator at the very end
/// does not start another, empty line.
pub fn source_lines(content: &str) -> impl Iterator<Item = SourceLine<'_>> {
    let mut rest = Some(content).filter(|c| !c.is_empty());
    std::iter::from_fn(move || {
        let text = rest?;
        match text.find(['\r', '\n']) {
            Some(end) => {
                let skip = if text[end..].starts_with("\r\n") { 2 } else { 1 };
                rest = Some(&text[end + skip..]).filter(|r| !r.is_empty());
                Some(&text[..end])
            }
            None => {
                rest = None;
                Some(text)
            }
        }
    })
    .enumerate()
    .map(|(number, text)| SourceLine::new(number, text))
}

/// Decode file bytes as UTF-8, dropping invalid sequences.
///
/// ```
/// use sigmap::signatures::decode_lossy;
///
/// assert_eq!(decode_lossy(b"def comp\xffute():"), "def compute():");
/// ```
pub fn decode_lossy(bytes: &[u8]) -> String {
    let mut decoded = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        decoded.push_str(chunk.valid());
    }
    decoded
}

/// A declaration kept in the map: the source line's indent plus header text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignatureEntry {
    pub indent: String,
    pub text: String,
}

impl SignatureEntry {
    pub fn new(indent: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            indent: indent.into(),
            text: text.into(),
        }
    }

    /// Entry carrying `text` at the indent of `line`.
    pub(crate) fn at(line: &SourceLine<'_>, text: impl Into<String>) -> Self {
        Self::new(line.indent, text)
    }

    /// Inline entry reporting that a file could not be read.
    pub fn diagnostic(category: Category, error: &std::io::Error) -> Self {
        Self::new(
            "",
            format!("{} Error reading file: {}", category.comment_marker(), error),
        )
    }
}

impl std::fmt::Display for SignatureEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.indent, self.text)
    }
}

/// A classifier hit for a single line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classified {
    pub kind: DeclarationKind,
    pub entry: SignatureEntry,
}

impl Classified {
    pub(crate) fn new(kind: DeclarationKind, line: &SourceLine<'_>, text: impl Into<String>) -> Self {
        Self {
            kind,
            entry: SignatureEntry::at(line, text),
        }
    }

    /// Keep the hit as a map entry.
    pub(crate) fn into_entry(self, line: &SourceLine<'_>) -> SignatureEntry {
        trace!(line = line.number, kind = %self.kind, "matched declaration");
        self.entry
    }
}

/// Classify one line on its own, without any cross-line context.
///
/// Decorator lines in the script-dynamic category are reported as
/// [`DeclarationKind::Decorator`]; whether they survive into a file's
/// signatures depends on what follows them.
///
/// ```
/// use sigmap::filter::Category;
/// use sigmap::signatures::{classify_line, DeclarationKind};
///
/// let hit = classify_line("    def run(self):", Category::ScriptDynamic).unwrap();
/// assert_eq!(hit.kind, DeclarationKind::Function);
/// assert_eq!(hit.entry.indent, "    ");
///
/// assert!(classify_line("  if (ready) {", Category::CurlyBrace).is_none());
/// ```
pub fn classify_line(text: &str, category: Category) -> Option<Classified> {
    let line = SourceLine::new(0, text);
    match category {
        Category::ScriptDynamic => python::classify(&line),
        Category::CurlyBrace => javascript::classify(&line),
        Category::Shell => shell::classify(&line),
    }
}

/// Extract signatures from in-memory content.
pub fn extract_str(content: &str, category: Category) -> Vec<SignatureEntry> {
    let lines = source_lines(content);
    match category {
        Category::ScriptDynamic => python::extract(lines),
        Category::CurlyBrace => javascript::extract(lines),
        Category::Shell => shell::extract(lines),
    }
}

/// Extract signatures from a file.
///
/// Never fails: an unreadable file yields a single diagnostic entry, and
/// invalid UTF-8 byte sequences are dropped. Returns an empty list when nothing
/// matches.
pub fn extract_file(path: &Path, category: Category) -> Vec<SignatureEntry> {
    match std::fs::read(path) {
        Ok(bytes) => {
            let content = decode_lossy(&bytes);
            let entries = extract_str(&content, category);
            debug!(
                path = %path.display(),
                %category,
                signatures = entries.len(),
                "extracted signatures"
            );
            entries
        }
        Err(err) => {
            debug!(path = %path.display(), error = %err, "failed to read file");
            vec![SignatureEntry::diagnostic(category, &err)]
        }
    }
}
