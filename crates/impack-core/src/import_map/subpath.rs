//! Package-manifest subpath imports (`#`-prefixed specifiers).
//!
//! A specifier like `#lib/widget` is private to the package that declares it:
//! resolution walks up from the importing file's directory to the working
//! directory root, looking for the nearest `package.json` with an `imports`
//! table. Keys carry at most one `*` wildcard.

use serde_json::Value;
use std::path::Path;
use tracing::debug;

/// Sigil marking a package-internal import specifier.
pub const IMPORT_SIGIL: char = '#';

/// Resolve a `#`-prefixed specifier against the nearest package manifest.
///
/// Walks from `start_dir` up to and including `stop_root`. The first
/// manifest whose `imports` table matches wins; manifests without a match
/// are skipped and the walk continues. Returns `None` when nothing up to
/// the root matches — the caller must then leave the specifier untouched.
///
/// # Panics
/// A manifest `imports` key that does not start with `#`, or that contains
/// more than one `*`, indicates an unsupported project manifest and aborts
/// the run.
pub async fn find_package_subpath_import(
    specifier: &str,
    start_dir: &Path,
    stop_root: &Path,
) -> Option<String> {
    if !specifier.starts_with(IMPORT_SIGIL) {
        return None;
    }

    let mut current = start_dir.to_path_buf();
    loop {
        let manifest = current.join("package.json");
        if let Some(imports) = read_imports_table(&manifest).await {
            if let Some(target) = match_imports_table(&imports, specifier) {
                debug!(
                    specifier,
                    manifest = %manifest.display(),
                    target = %target,
                    "subpath import matched"
                );
                return Some(target);
            }
        }

        if current == stop_root || !current.pop() {
            return None;
        }
    }
}

/// Read the `imports` table from a package manifest, if any.
async fn read_imports_table(manifest: &Path) -> Option<serde_json::Map<String, Value>> {
    let contents = tokio::fs::read_to_string(manifest).await.ok()?;
    let pkg: Value = serde_json::from_str(&contents).ok()?;
    pkg.get("imports")?.as_object().cloned()
}

/// Match a specifier against one manifest's `imports` table.
///
/// An exact key match wins. Otherwise a key containing exactly one `*`
/// splits into (prefix, suffix); the specifier must start with the prefix
/// and, if the suffix is non-empty, end with it. The captured middle
/// replaces every `*` occurrence in the value. The most specific pattern
/// (longest key) wins among wildcard candidates.
fn match_imports_table(
    imports: &serde_json::Map<String, Value>,
    specifier: &str,
) -> Option<String> {
    // An invalid table must not be silently tolerated.
    for key in imports.keys() {
        assert!(
            key.starts_with(IMPORT_SIGIL),
            "package manifest imports key {key:?} does not start with '#'"
        );
        let stars = key.chars().filter(|&c| c == '*').count();
        assert!(
            stars <= 1,
            "package manifest imports key {key:?} contains {stars} wildcards (at most one supported)"
        );
    }

    // Exact match wins.
    if let Some(target) = imports.get(specifier).and_then(Value::as_str) {
        return Some(target.to_string());
    }

    // Wildcard candidates, most specific (longest key) first.
    let mut candidates: Vec<(&str, &str, String)> = Vec::new();
    for (key, value) in imports {
        if !key.contains('*') {
            continue;
        }
        let Some(value) = value.as_str() else {
            continue;
        };
        if let Some(middle) = match_wildcard(key, specifier) {
            candidates.push((key.as_str(), value, middle));
        }
    }

    if candidates.is_empty() {
        return None;
    }

    candidates.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(b.0)));
    let (_, value, middle) = &candidates[0];
    Some(value.replace('*', middle))
}

/// Divide a single-wildcard key into (prefix, suffix) and capture the middle.
fn match_wildcard(key: &str, specifier: &str) -> Option<String> {
    let star = key.find('*')?;
    let prefix = &key[..star];
    let suffix = &key[star + 1..];

    if !specifier.starts_with(prefix) {
        return None;
    }
    if !suffix.is_empty() && !specifier.ends_with(suffix) {
        return None;
    }

    let start = prefix.len();
    let end = specifier.len().checked_sub(suffix.len())?;
    if start > end {
        return None;
    }

    Some(specifier[start..end].to_string())
}
