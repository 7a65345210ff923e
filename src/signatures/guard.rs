//! Control-flow guard for the curly-brace family.
//!
//! `if (ready) {` and `render() {` have the same shape as far as the header
//! patterns are concerned, so lines led by a reserved control keyword are
//! rejected before any pattern runs.

use super::SourceLine;

/// Conditional, loop, exception and jump keywords.
pub const CONTROL_FLOW_KEYWORDS: &[&str] = &[
    "if", "else", "for", "while", "switch", "case", "catch", "try", "finally", "return", "throw",
    "break", "continue", "do", "with",
];

/// Whether a line must be kept away from the classifier.
pub fn rejects(line: &SourceLine<'_>) -> bool {
    let token = line.first_token();
    !token.is_empty()
        && CONTROL_FLOW_KEYWORDS
            .iter()
            .any(|kw| kw.eq_ignore_ascii_case(token))
}
