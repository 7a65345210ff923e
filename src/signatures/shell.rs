//! Shell function extraction.
//!
//! Both `name() {` and `function name` forms are recognized. No guard is
//! needed: control keywords never take either shape.

use std::sync::LazyLock;

use regex::Regex;

use super::{Classified, DeclarationKind, SignatureEntry, SourceLine};

static PAREN_FORM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\w+\s*\(\)\s*\{)").expect("PAREN_FORM regex is invalid")
});
static KEYWORD_FORM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(function\s+\w+)").expect("KEYWORD_FORM regex is invalid")
});

/// Match either shell function form, keeping the text as written.
pub fn classify(line: &SourceLine<'_>) -> Option<Classified> {
    let body = line.body();
    PAREN_FORM
        .captures(body)
        .or_else(|| KEYWORD_FORM.captures(body))
        .map(|caps| Classified::new(DeclarationKind::ShellFunction, line, &caps[1]))
}

/// Extract shell function signatures from a line stream.
pub fn extract<'a>(lines: impl Iterator<Item = SourceLine<'a>>) -> Vec<SignatureEntry> {
    lines
        .filter_map(|line| classify(&line).map(|hit| hit.into_entry(&line)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signatures::source_lines;

    fn run(code: &str) -> Vec<String> {
        extract(source_lines(code))
            .into_iter()
            .map(|e| e.to_string())
            .collect()
    }

    #[test]
    fn test_paren_form() {
        assert_eq!(run("deploy() {\n  echo ok\n}\n"), vec!["deploy() {"]);
        assert_eq!(run("build_all  ()   {"), vec!["build_all  ()   {"]);
    }

    #[test]
    fn test_keyword_form() {
        assert_eq!(
            run("function cleanup {\n  rm -rf tmp\n}\nfunction setup() {\n"),
            vec!["function cleanup", "function setup"]
        );
    }

    #[test]
    fn test_nested_indent_preserved() {
        assert_eq!(run("main() {\n  inner() {\n  }\n}\n"), vec!["main() {", "  inner() {"]);
    }

    #[test]
    fn test_control_flow_and_calls_ignored() {
        let code = "#!/bin/bash\nif [ -f x ]; then\n  deploy\nfi\nfor f in *; do\ndone\nlog \"()\"\n";
        assert!(run(code).is_empty());
    }

    #[test]
    fn test_paren_form_without_brace_ignored() {
        assert!(run("deploy()\n{\n").is_empty());
    }
}
