//! Script-dynamic (Python) signature extraction.
//!
//! Class and `def` headers are kept through their terminating colon.
//! Decorators are only kept when they sit directly on top of a header at
//! the same indent.

use std::sync::LazyLock;

use regex::Regex;
use smallvec::SmallVec;
use tracing::trace;

use super::{Classified, DeclarationKind, SignatureEntry, SourceLine};

static CLASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(class\s+\w+[^:]*:)").expect("CLASS regex is invalid")
});
static FUNCTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^((?:async\s+)?def\s+\w+\s*\([^)]*\)[^:]*:)").expect("FUNCTION regex is invalid")
});
static DECORATOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(@\w+(?:\.\w+)*(?:\([^)]*\))?)").expect("DECORATOR regex is invalid")
});

/// Match a class or function header.
pub fn header(line: &SourceLine<'_>) -> Option<Classified> {
    if let Some(caps) = CLASS.captures(line.body()) {
        return Some(Classified::new(DeclarationKind::Class, line, &caps[1]));
    }
    FUNCTION
        .captures(line.body())
        .map(|caps| Classified::new(DeclarationKind::Function, line, &caps[1]))
}

/// Match a decorator line (`@name`, dotted path, optional argument list).
pub fn decorator(line: &SourceLine<'_>) -> Option<Classified> {
    DECORATOR
        .captures(line.body())
        .map(|caps| Classified::new(DeclarationKind::Decorator, line, &caps[1]))
}

/// Single-line classification; decorators take precedence over headers.
pub fn classify(line: &SourceLine<'_>) -> Option<Classified> {
    decorator(line).or_else(|| header(line))
}

/// Decorator run waiting for the header it belongs to.
#[derive(Debug, Default)]
enum Aggregator<'a> {
    #[default]
    Idle,
    Collecting {
        indent: &'a str,
        group: SmallVec<[SignatureEntry; 4]>,
    },
}

impl<'a> Aggregator<'a> {
    /// Advance the state machine by one line, appending kept entries to `out`.
    fn feed(&mut self, line: &SourceLine<'a>, out: &mut Vec<SignatureEntry>) {
        match std::mem::take(self) {
            Aggregator::Idle => {
                if let Some(hit) = decorator(line) {
                    let mut group = SmallVec::new();
                    group.push(hit.into_entry(line));
                    *self = Aggregator::Collecting {
                        indent: line.indent,
                        group,
                    };
                } else if let Some(hit) = header(line) {
                    out.push(hit.into_entry(line));
                }
            }
            Aggregator::Collecting { indent, mut group } => {
                if line.indent == indent {
                    if let Some(hit) = decorator(line) {
                        group.push(hit.into_entry(line));
                        *self = Aggregator::Collecting { indent, group };
                        return;
                    }
                }

                if let Some(hit) = header(line) {
                    out.extend(group);
                    out.push(hit.into_entry(line));
                } else {
                    trace!(
                        line = line.number,
                        dropped = group.len(),
                        "decorators not followed by a declaration"
                    );
                    // Look at the line again with no run in progress.
                    self.feed(line, out);
                }
            }
        }
    }

    /// End of input: an unfinished run is dropped.
    fn finish(self) {
        if let Aggregator::Collecting { group, .. } = self {
            trace!(dropped = group.len(), "decorators at end of file");
        }
    }
}

/// Extract script-dynamic signatures from a line stream.
pub fn extract<'a>(lines: impl Iterator<Item = SourceLine<'a>>) -> Vec<SignatureEntry> {
    let mut out = Vec::new();
    let mut aggregator = Aggregator::Idle;
    for line in lines {
        aggregator.feed(&line, &mut out);
    }
    aggregator.finish();
    out
}
