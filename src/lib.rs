//! sigmap - Generate a condensed signature map of a source tree.
//!
//! sigmap walks a project, keeps only the declaration headers of each code
//! file (classes, functions, methods, interfaces, type aliases, shell
//! functions) and renders them as an indented, directory-nested document.
//!
//! # Quick Start
//!
//! ```no_run
//! use sigmap::builder::SigMap;
//! use sigmap::output::{render, OutputFormat, OutputOptions};
//!
//! let map = SigMap::new("./my-project").build().unwrap();
//! let document = render(&map.tree, &OutputOptions::stamped(OutputFormat::Markdown)).unwrap();
//!
//! println!("{} signatures in {} code files", map.signature_count(), map.code_file_count());
//! std::fs::write("PROJECT_MAP.md", document).unwrap();
//! ```
//!
//! # Modules
//!
//! - [`signatures`] - Line classification and per-file extraction
//! - [`filter`] - Extension to category dispatch
//! - [`config`] - Ignore rules and `.sigmap.toml`
//! - [`walker`] - Directory traversal
//! - [`tree`] - Project tree representation
//! - [`output`] - Markdown and JSON rendering
//! - [`tokens`] - Size of the rendered map
//! - [`builder`] - Fluent API tying it together
//!
//! # Supported Files
//!
//! - Python (`.py`)
//! - JavaScript/TypeScript (`.js`, `.jsx`, `.ts`, `.tsx`)
//! - Shell (`.sh`)

pub mod builder;
pub mod config;
pub mod errors;
pub mod filter;
pub mod output;
pub mod signatures;
pub mod tokens;
pub mod tree;
pub mod walker;

pub use builder::{ProjectMap, SigMap};
pub use config::{ConfigError, IgnoreRules, ProjectConfig};
pub use errors::SigmapError;
pub use filter::{Category, FilterError};
pub use output::{OutputError, OutputFormat, OutputOptions};
pub use signatures::{decode_lossy, extract_file, extract_str, DeclarationKind, SignatureEntry, SourceLine};
pub use tokens::{Encoding, MapStats};
pub use tree::{FileNode, NodeKind};
pub use walker::WalkError;
