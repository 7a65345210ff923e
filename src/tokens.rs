//! Size of a rendered project map.
//!
//! The map is usually handed to a language model, so besides its line count
//! we report a token estimate from tiktoken. If the tokenizer cannot be
//! loaded the estimate falls back to ~4 bytes per token.

use std::sync::OnceLock;

use serde::Serialize;
use tiktoken_rs::CoreBPE;

/// Tokenizer used for the estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Encoding {
    /// cl100k_base: GPT-4, GPT-3.5-turbo
    #[default]
    #[serde(rename = "cl100k_base")]
    Cl100kBase,
    /// o200k_base: GPT-4o
    #[serde(rename = "o200k_base")]
    O200kBase,
}

impl std::fmt::Display for Encoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Encoding::Cl100kBase => write!(f, "cl100k_base"),
            Encoding::O200kBase => write!(f, "o200k_base"),
        }
    }
}

impl std::str::FromStr for Encoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cl100k" | "cl100k_base" => Ok(Encoding::Cl100kBase),
            "o200k" | "o200k_base" => Ok(Encoding::O200kBase),
            _ => Err(format!("unknown encoding: {}", s)),
        }
    }
}

static CL100K: OnceLock<Option<CoreBPE>> = OnceLock::new();
static O200K: OnceLock<Option<CoreBPE>> = OnceLock::new();

fn tokenizer(encoding: Encoding) -> Option<&'static CoreBPE> {
    match encoding {
        Encoding::Cl100kBase => CL100K.get_or_init(|| tiktoken_rs::cl100k_base().ok()),
        Encoding::O200kBase => O200K.get_or_init(|| tiktoken_rs::o200k_base().ok()),
    }
    .as_ref()
}

fn fallback_count(text: &str) -> usize {
    text.len().div_ceil(4)
}

/// Count tokens in `text`. Never fails.
///
/// ```
/// use sigmap::tokens::{count_tokens, Encoding};
///
/// assert!(count_tokens("def main():", Encoding::Cl100kBase) > 0);
/// ```
pub fn count_tokens(text: &str, encoding: Encoding) -> usize {
    tokenizer(encoding)
        .map(|bpe| bpe.encode_ordinary(text).len())
        .unwrap_or_else(|| fallback_count(text))
}

/// Line and token totals of a rendered document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MapStats {
    pub lines: usize,
    pub tokens: usize,
    pub encoding: Encoding,
}

impl MapStats {
    pub fn measure(document: &str, encoding: Encoding) -> Self {
        let newlines = bytecount::count(document.as_bytes(), b'\n');
        // a trailing line without a newline still counts
        let lines = newlines + usize::from(!document.is_empty() && !document.ends_with('\n'));
        Self {
            lines,
            tokens: count_tokens(document, encoding),
            encoding,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_string() {
        assert_eq!(count_tokens("", Encoding::Cl100kBase), 0);
    }

    #[test]
    fn test_signature_text() {
        let count = count_tokens("def compute(x: int) -> int:", Encoding::O200kBase);
        assert!(count > 0 && count < 20);
    }

    #[test]
    fn test_fallback_approximation() {
        assert_eq!(fallback_count(""), 0);
        assert_eq!(fallback_count("a"), 1);
        assert_eq!(fallback_count("abcd"), 1);
        assert_eq!(fallback_count("abcde"), 2);
    }

    #[test]
    fn test_encoding_from_str() {
        assert_eq!("cl100k".parse::<Encoding>().unwrap(), Encoding::Cl100kBase);
        assert_eq!("O200K_BASE".parse::<Encoding>().unwrap(), Encoding::O200kBase);
        assert!("p50k".parse::<Encoding>().is_err());
    }

    #[test]
    fn test_measure_lines() {
        assert_eq!(MapStats::measure("", Encoding::default()).lines, 0);
        assert_eq!(MapStats::measure("a\nb\n", Encoding::default()).lines, 2);
        assert_eq!(MapStats::measure("a\nb", Encoding::default()).lines, 2);
        assert_eq!(MapStats::measure("a\n\n", Encoding::default()).lines, 2);
    }
}
