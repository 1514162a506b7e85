//! Manifest emission.
//!
//! Two formats: a pretty-printed JSON import map, or a worker-config module
//! list spliced into a template at every empty `modules = []` declaration.

use crate::graph::Manifest;
use regex_lite::Regex;
use std::sync::OnceLock;

/// Empty module-list declaration placeholder in a worker config template.
const MODULES_PATTERN: &str = r"modules\s*=\s*\[[^\]]*],?";

fn modules_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(MODULES_PATTERN).expect("modules pattern compiles"))
}

/// Pretty-print the manifest as `{ "imports": { ... } }`, in manifest order.
#[must_use]
pub fn emit_json(manifest: &Manifest) -> String {
    let mut imports = serde_json::Map::new();
    for (key, value) in manifest.entries() {
        imports.insert(key.clone(), serde_json::Value::String(value.clone()));
    }
    let payload = serde_json::json!({ "imports": imports });
    serde_json::to_string_pretty(&payload).expect("manifest serializes to JSON")
}

/// Render the manifest as embedded-module records.
#[must_use]
pub fn render_module_list(manifest: &Manifest) -> String {
    manifest
        .entries()
        .iter()
        .map(|(key, value)| format!("(name = \"{key}\", esModule = embed \"{value}\")"))
        .collect::<Vec<_>>()
        .join(",\n")
}

/// Emit the structured module list, splicing into `template` when given.
///
/// Every `modules = [...]` placeholder in the template is replaced with the
/// rendered list, preserving a trailing comma and matching the placeholder
/// line's indentation (list body indented twice). Non-placeholder content
/// is never altered. Without a template the bare list is returned.
#[must_use]
pub fn emit_structured(manifest: &Manifest, template: Option<&str>) -> String {
    let modules = render_module_list(manifest);

    let Some(template) = template else {
        return format!("modules = [\n{}\n]", tab(&modules, "  "));
    };

    let mut output = template.to_string();
    let found: Vec<String> = modules_regex()
        .find_iter(template)
        .map(|m| m.as_str().to_string())
        .collect();

    for placeholder in found {
        let suffix = if placeholder.ends_with(',') { "," } else { "" };
        let whitespace = output
            .lines()
            .find(|line| line.contains(&placeholder))
            .and_then(|line| line.split(&placeholder).next())
            .unwrap_or("")
            .to_string();

        let replacement = format!(
            "modules = [\n{}\n{}]{}",
            tab(&modules, &format!("{whitespace}{whitespace}")),
            whitespace,
            suffix
        );
        output = output.replacen(&placeholder, &replacement, 1);
    }

    output
}

/// Prefix every line of `text` with `tabs`.
fn tab(text: &str, tabs: &str) -> String {
    text.split('\n')
        .map(|line| format!("{tabs}{line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manifest() -> Manifest {
        let mut manifest = Manifest::new();
        manifest.insert("build/main.js", "build/main.js");
        manifest.insert("build/lib/a.js", "build/lib/a.js");
        manifest
    }

    #[test]
    fn test_emit_json_in_manifest_order() {
        let rendered = emit_json(&manifest());
        let main = rendered.find("build/main.js").unwrap();
        let lib = rendered.find("build/lib/a.js").unwrap();
        assert!(main < lib);

        let parsed: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(parsed["imports"]["build/main.js"], "build/main.js");
    }

    #[test]
    fn test_render_module_list() {
        let rendered = render_module_list(&manifest());
        assert_eq!(
            rendered,
            "(name = \"build/main.js\", esModule = embed \"build/main.js\"),\n\
             (name = \"build/lib/a.js\", esModule = embed \"build/lib/a.js\")"
        );
    }

    #[test]
    fn test_emit_structured_without_template() {
        let rendered = emit_structured(&manifest(), None);
        assert!(rendered.starts_with("modules = [\n"));
        assert!(rendered.ends_with("\n]"));
        assert!(rendered.contains("  (name = \"build/main.js\""));
    }

    #[test]
    fn test_emit_structured_splices_template() {
        let template =
            "const worker :Workerd.Worker = (\n  modules = [],\n  compatibilityDate = \"2024-01-01\",\n);\n";
        let rendered = emit_structured(&manifest(), Some(template));

        // Trailing comma preserved, placeholder replaced.
        assert!(rendered.contains("  modules = [\n"));
        assert!(rendered.contains("  ],\n"));
        // Body indented at twice the placeholder's indentation.
        assert!(rendered.contains("    (name = \"build/main.js\""));
        // Non-placeholder content untouched.
        assert!(rendered.contains("compatibilityDate = \"2024-01-01\","));
        assert!(!rendered.contains("modules = [],"));
    }

    #[test]
    fn test_emit_structured_rewrites_every_placeholder() {
        let template = "a = (\n  modules = [],\n);\nb = (\n  modules = [],\n);\n";
        let rendered = emit_structured(&manifest(), Some(template));
        assert_eq!(rendered.matches("(name = \"build/main.js\"").count(), 2);
        assert!(!rendered.contains("modules = [],"));
    }

    #[test]
    fn test_emit_structured_no_placeholder_returns_template_unchanged() {
        let template = "const worker = (\n  bindings = [],\n);\n";
        assert_eq!(emit_structured(&manifest(), Some(template)), template);
    }

    #[test]
    fn test_emit_structured_placeholder_without_comma() {
        let template = "modules = []";
        let rendered = emit_structured(&manifest(), Some(template));
        assert!(rendered.starts_with("modules = [\n"));
        assert!(rendered.ends_with(']'));
        assert!(!rendered.ends_with("],"));
    }

    #[test]
    fn test_emit_json_empty_manifest() {
        let rendered = emit_json(&Manifest::new());
        let parsed: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert!(parsed["imports"].as_object().unwrap().is_empty());
    }
}
