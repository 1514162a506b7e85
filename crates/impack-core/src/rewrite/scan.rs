//! Lexical statement extraction.
//!
//! Statements are matched textually, not parsed. The recognized grammar is
//! deliberately narrow and must stay exactly this wide: double-quoted
//! specifiers only, semicolon-terminated static statements, single-line
//! statements. Downstream consumers depend on this leniency (it also means
//! a quoted import inside a line comment is matched — the grammar is
//! comment-agnostic).

use regex_lite::Regex;
use std::sync::OnceLock;

/// Recognized statement shapes: `import/export ... "specifier";` and
/// `import("specifier")`.
const STATEMENT_PATTERN: &str = r#"(?:(?:import|export)(?: .+ from)? ".+";|import\(".+"\))"#;

/// Specifier within a matched statement: greedy first-to-last quote.
const SPECIFIER_PATTERN: &str = r#""(.+)""#;

fn statement_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(STATEMENT_PATTERN).expect("statement pattern compiles"))
}

fn specifier_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(SPECIFIER_PATTERN).expect("specifier pattern compiles"))
}

/// Find every import/export/dynamic-import statement in `source`, in order.
pub fn find_statements(source: &str) -> impl Iterator<Item = &str> + '_ {
    statement_regex().find_iter(source).map(|m| m.as_str())
}

/// Extract the quoted specifier from a matched statement.
pub fn extract_specifier(statement: &str) -> Option<&str> {
    specifier_regex()
        .captures(statement)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn statements(source: &str) -> Vec<&str> {
        find_statements(source).collect()
    }

    #[test]
    fn test_import_from() {
        let found = statements(r#"import { a } from "./dep";"#);
        assert_eq!(found, vec![r#"import { a } from "./dep";"#]);
        assert_eq!(extract_specifier(found[0]), Some("./dep"));
    }

    #[test]
    fn test_side_effect_import() {
        let found = statements(r#"import "./polyfill";"#);
        assert_eq!(found.len(), 1);
        assert_eq!(extract_specifier(found[0]), Some("./polyfill"));
    }

    #[test]
    fn test_export_from() {
        let found = statements(r#"export { a } from "./dep";"#);
        assert_eq!(found.len(), 1);
        assert_eq!(extract_specifier(found[0]), Some("./dep"));
    }

    #[test]
    fn test_export_star_from() {
        let found = statements(r#"export * from "@scope/pkg";"#);
        assert_eq!(extract_specifier(found[0]), Some("@scope/pkg"));
    }

    #[test]
    fn test_dynamic_import_without_semicolon() {
        let found = statements(r#"const mod = await import("./lazy")"#);
        assert_eq!(found, vec![r#"import("./lazy")"#]);
        assert_eq!(extract_specifier(found[0]), Some("./lazy"));
    }

    #[test]
    fn test_single_quotes_not_recognized() {
        assert!(statements("import { a } from './dep';").is_empty());
    }

    #[test]
    fn test_static_statement_requires_semicolon() {
        assert!(statements(r#"import { a } from "./dep""#).is_empty());
    }

    #[test]
    fn test_multiline_statement_not_recognized() {
        let source = "import {\n  a\n} from \"./dep\";";
        assert!(statements(source).is_empty());
    }

    #[test]
    fn test_commented_import_still_matched() {
        // The grammar is comment-agnostic.
        let found = statements(r#"// import { a } from "./dep";"#);
        assert_eq!(found, vec![r#"import { a } from "./dep";"#]);
    }

    #[test]
    fn test_plain_code_not_matched() {
        assert!(statements("const x = 42;\nconsole.log(x);").is_empty());
    }

    #[test]
    fn test_multiple_statements_in_order() {
        let source = "import a from \"./a\";\nexport { b } from \"./b\";\nimport(\"./c\")\n";
        let specs: Vec<_> = statements(source)
            .into_iter()
            .filter_map(extract_specifier)
            .collect();
        assert_eq!(specs, vec!["./a", "./b", "./c"]);
    }

    #[test]
    fn test_greedy_specifier_extraction() {
        // Two statements on one line collapse into a single greedy match;
        // preserved source behavior.
        let found = statements(r#"import a from "./a"; import b from "./b";"#);
        assert_eq!(found.len(), 1);
        assert_eq!(
            extract_specifier(found[0]),
            Some(r#"./a"; import b from "./b"#)
        );
    }
}
