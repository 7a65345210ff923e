//! Curly-brace family (JavaScript/TypeScript) signature extraction.
//!
//! Patterns are tried in a fixed order because several of them share a
//! prefix (`export type X =` and `export interface X` both start with the
//! export modifier). Every line goes through the control-flow guard first.

use std::sync::LazyLock;

use regex::Regex;

use super::{guard, Classified, DeclarationKind, SignatureEntry, SourceLine};

macro_rules! pattern {
    ($name:ident, $re:expr) => {
        static $name: LazyLock<Regex> =
            LazyLock::new(|| Regex::new($re).expect(concat!(stringify!($name), " regex is invalid")));
    };
}

pattern!(INTERFACE, r"^((?:export\s+)?interface\s+\w+[^{]*)");
pattern!(TYPE_ALIAS, r"^((?:export\s+)?type\s+\w+\s*=)");
pattern!(CLASS, r"^((?:export\s+)?(?:default\s+)?class\s+\w+[^{]*)");
pattern!(
    FUNCTION,
    r"^((?:export\s+)?(?:default\s+)?(?:async\s+)?function\s+\w+\s*\([^)]*\)[^{]*)"
);
pattern!(
    ARROW,
    r"^((?:export\s+)?(?:const|let|var)\s+\w+\s*=\s*(?:async\s+)?\([^)]*\)\s*=>)"
);
pattern!(
    ARROW_BARE_PARAM,
    r"^((?:export\s+)?(?:const|let|var)\s+\w+\s*=\s*(?:async\s+)?\w+\s*=>)"
);
pattern!(
    METHOD,
    r"^((?:async\s+)?(?:get\s+|set\s+)?\w+\s*\([^)]*\)\s*\{)"
);

/// Header patterns in priority order. The bare method form is handled
/// separately since it needs the indent and rewrites its text.
static HEADERS: LazyLock<[(&'static Regex, DeclarationKind); 6]> = LazyLock::new(|| {
    [
        (&*INTERFACE, DeclarationKind::Interface),
        (&*TYPE_ALIAS, DeclarationKind::TypeAlias),
        (&*CLASS, DeclarationKind::Class),
        (&*FUNCTION, DeclarationKind::Function),
        (&*ARROW, DeclarationKind::Function),
        (&*ARROW_BARE_PARAM, DeclarationKind::Function),
    ]
});

/// Classify a line, returning `None` for guarded or unmatched lines.
pub fn classify(line: &SourceLine<'_>) -> Option<Classified> {
    if guard::rejects(line) {
        return None;
    }

    let body = line.body();
    let hit = HEADERS
        .iter()
        .find_map(|(regex, kind)| regex.captures(body).map(|caps| (*kind, caps)))
        // Top-level `name(...) {` is far more likely an object literal or a
        // call than a method, so only indented lines qualify.
        .or_else(|| {
            line.is_indented()
                .then(|| METHOD.captures(body))
                .flatten()
                .map(|caps| (DeclarationKind::Method, caps))
        });

    hit.map(|(kind, caps)| Classified::new(kind, line, header_text(kind, &caps[1])))
}

/// Text kept for a captured header. Methods lose their `{` and get a `()`
/// suffix; everything else is trimmed.
fn header_text(kind: DeclarationKind, captured: &str) -> String {
    match kind {
        DeclarationKind::Method => format!("{}()", captured.trim_end_matches('{').trim()),
        _ => captured.trim().to_string(),
    }
}

/// Extract curly-brace signatures from a line stream.
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

    fn kind_of(text: &str) -> Option<DeclarationKind> {
        classify(&SourceLine::new(0, text)).map(|hit| hit.kind)
    }

    #[test]
    fn test_arrow_with_params() {
        assert_eq!(
            run("export const add = (a, b) => {\n  return a + b;\n};\n"),
            vec!["export const add = (a, b) =>"]
        );
    }

    #[test]
    fn test_arrow_bare_param() {
        assert_eq!(
            run("const double = async x => x * 2;\n"),
            vec!["const double = async x =>"]
        );
    }

    #[test]
    fn test_interface_and_type() {
        let code = "export interface User {\n  id: string;\n}\ntype Id = string | number;\n";
        assert_eq!(run(code), vec!["export interface User", "type Id ="]);
        assert_eq!(kind_of("interface A {"), Some(DeclarationKind::Interface));
        assert_eq!(kind_of("export type A = {"), Some(DeclarationKind::TypeAlias));
    }

    #[test]
    fn test_class_and_methods() {
        let code = r#"
export default class Store extends Base {
  constructor(opts) {
    super(opts);
  }

  async load(id) {
    if (!id) {
      return null;
    }
    for (const k of keys) {
    }
  }

  get size() {
    return 0;
  }
}
"#;
        assert_eq!(
            run(code),
            vec![
                "export default class Store extends Base",
                "  constructor(opts)()",
                "  async load(id)()",
                "  get size()()",
            ]
        );
    }

    #[test]
    fn test_method_kind_drives_text() {
        let hit = classify(&SourceLine::new(0, "  render() {")).unwrap();
        assert_eq!(hit.kind, DeclarationKind::Method);
        assert_eq!(hit.entry.text, "render()()");

        let hit = classify(&SourceLine::new(0, "  const f = (a) => {")).unwrap();
        assert_eq!(hit.kind, DeclarationKind::Function);
        assert_eq!(hit.entry.text, "const f = (a) =>");
        assert_eq!(DeclarationKind::Method.to_string(), "method");
    }

    #[test]
    fn test_function_declarations() {
        let code = "export async function fetchAll(url: string): Promise<void> {\nfunction helper() {\n";
        assert_eq!(
            run(code),
            vec![
                "export async function fetchAll(url: string): Promise<void>",
                "function helper()",
            ]
        );
    }

    #[test]
    fn test_guard_blocks_control_flow_that_looks_like_a_method() {
        // would satisfy the method pattern without the guard
        assert_eq!(run("    if (ready) {\n    while (x) {\n    switch (k) {\n"), Vec::<String>::new());
        assert!(kind_of("  catch (err) {").is_none());
    }

    #[test]
    fn test_top_level_call_is_not_a_method() {
        assert!(run("describe(\"suite\", () => {\nfoo() {\n").is_empty());
    }

    #[test]
    fn test_multiline_parameters_not_detected() {
        assert!(run("  process(\n    a,\n    b\n  ) {\n").is_empty());
    }

    #[test]
    fn test_plain_statements_ignored() {
        assert!(run("import x from 'y';\nconst a = 1;\nlet b = a + 2;\n}\n").is_empty());
    }

    #[test]
    fn test_indent_preserved() {
        let entries = extract(source_lines("\t\tconst f = (x) => {\n"));
        assert_eq!(entries[0].indent, "\t\t");
        assert_eq!(entries[0].text, "const f = (x) =>");
    }
}
