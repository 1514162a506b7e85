//! Dependency graph traversal.
//!
//! Computes the manifest: every module the packed artifact needs at run
//! time, each mapped to itself. With an entrypoint configured, only the
//! transitive closure of explicitly relative imports is included; without
//! one, every module file under the output directory is.

use crate::config::PackConfig;
use crate::paths::{self, strip_dot_prefix};
use crate::rewrite::scan;
use std::collections::{HashSet, VecDeque};
use tracing::debug;

/// The final module manifest: insertion-ordered specifier→path pairs,
/// deduplicated by key. Computed once after rewriting converges.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    entries: Vec<(String, String)>,
}

impl Manifest {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry unless the key is already present.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> bool {
        let key = key.into();
        if self.contains_key(&key) {
            return false;
        }
        self.entries.push((key, value.into()));
        true
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    #[must_use]
    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Build the manifest for a rewritten tree.
pub async fn build_manifest(config: &PackConfig) -> Manifest {
    match &config.entrypoint {
        Some(entrypoint) => {
            let key = paths::normalize(strip_dot_prefix(&paths::to_slash(entrypoint)));
            from_entrypoint(config, key).await
        }
        None => all_files(config),
    }
}

/// Flat closure: every module file under the output directory.
fn all_files(config: &PackConfig) -> Manifest {
    let root = config.cwd.join(&config.directory);
    let mut manifest = Manifest::new();
    for file in impack_util::fs::find_module_files(&root) {
        let rel = file.strip_prefix(&config.cwd).unwrap_or(&file);
        let key = paths::normalize(&paths::to_slash(rel));
        manifest.insert(key.clone(), key);
    }
    manifest
}

/// Transitive closure of explicitly relative imports from the entrypoint.
///
/// Bare and aliased specifiers are assumed already resolved to their final
/// runtime form and are not traversed. The seen set guarantees termination
/// on cyclic graphs; an unreadable file counts as having no imports.
async fn from_entrypoint(config: &PackConfig, entrypoint: String) -> Manifest {
    let mut manifest = Manifest::new();
    manifest.insert(entrypoint.clone(), entrypoint.clone());

    let mut seen: HashSet<String> = HashSet::new();
    seen.insert(entrypoint.clone());
    let mut queue: VecDeque<String> = VecDeque::new();
    queue.push_back(entrypoint);

    while let Some(module) = queue.pop_front() {
        let contents = match tokio::fs::read(config.cwd.join(&module)).await {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(err) => {
                debug!(module = %module, %err, "module unreadable during traversal, treating as leaf");
                continue;
            }
        };

        let dir = paths::dir_of(&module).to_string();
        for statement in scan::find_statements(&contents) {
            let Some(specifier) = scan::extract_specifier(statement) else {
                continue;
            };
            if !specifier.starts_with("./") && !specifier.starts_with("../") {
                continue;
            }
            let resolved = paths::join(&dir, specifier);
            manifest.insert(resolved.clone(), resolved.clone());
            if seen.insert(resolved.clone()) {
                queue.push_back(resolved);
            }
        }
    }

    manifest
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::{tempdir, TempDir};

    fn fixture() -> (TempDir, PackConfig) {
        let dir = tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("build")).unwrap();
        let config = PackConfig::new(dir.path().to_path_buf(), PathBuf::from("build"));
        (dir, config)
    }

    #[test]
    fn test_manifest_insert_dedups() {
        let mut manifest = Manifest::new();
        assert!(manifest.insert("a.js", "a.js"));
        assert!(!manifest.insert("a.js", "other.js"));
        assert_eq!(manifest.len(), 1);
        assert_eq!(manifest.entries()[0], ("a.js".into(), "a.js".into()));
    }

    #[tokio::test]
    async fn test_all_files_without_entrypoint() {
        let (dir, config) = fixture();
        std::fs::create_dir_all(dir.path().join("build/lib")).unwrap();
        std::fs::write(dir.path().join("build/main.js"), "").unwrap();
        std::fs::write(dir.path().join("build/lib/a.js"), "").unwrap();
        std::fs::write(dir.path().join("build/readme.md"), "").unwrap();

        let manifest = build_manifest(&config).await;
        assert_eq!(manifest.len(), 2);
        assert!(manifest.contains_key("build/main.js"));
        assert!(manifest.contains_key("build/lib/a.js"));
        for (key, value) in manifest.entries() {
            assert_eq!(key, value);
        }
    }

    #[tokio::test]
    async fn test_entrypoint_closure_follows_relative_imports() {
        let (dir, config) = fixture();
        std::fs::create_dir_all(dir.path().join("build/lib")).unwrap();
        std::fs::write(
            dir.path().join("build/main.js"),
            "import { a } from \"./lib/a.js\";\nimport fs from \"node:fs\";\nimport pkg from \"bare-pkg\";\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("build/lib/a.js"),
            "export * from \"./b.js\";\nexport const a = 1;\n",
        )
        .unwrap();
        std::fs::write(dir.path().join("build/lib/b.js"), "export const b = 2;\n").unwrap();
        // Unreferenced module stays out of the closure.
        std::fs::write(dir.path().join("build/unused.js"), "").unwrap();

        let config = config.with_entrypoint(PathBuf::from("./build/main.js"));
        let manifest = build_manifest(&config).await;

        let keys: Vec<_> = manifest.entries().iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["build/main.js", "build/lib/a.js", "build/lib/b.js"]);
    }

    #[tokio::test]
    async fn test_entrypoint_is_first_entry() {
        let (dir, config) = fixture();
        std::fs::write(
            dir.path().join("build/main.js"),
            "import \"./aaa.js\";\n",
        )
        .unwrap();
        std::fs::write(dir.path().join("build/aaa.js"), "").unwrap();

        let config = config.with_entrypoint(PathBuf::from("build/main.js"));
        let manifest = build_manifest(&config).await;
        assert_eq!(manifest.entries()[0].0, "build/main.js");
    }

    #[tokio::test]
    async fn test_cyclic_imports_terminate() {
        let (dir, config) = fixture();
        std::fs::write(
            dir.path().join("build/a.js"),
            "import { b } from \"./b.js\";\nexport const a = 1;\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("build/b.js"),
            "import { a } from \"./a.js\";\nexport const b = 2;\n",
        )
        .unwrap();

        let config = config.with_entrypoint(PathBuf::from("build/a.js"));
        let manifest = build_manifest(&config).await;

        assert_eq!(manifest.len(), 2);
        assert!(manifest.contains_key("build/a.js"));
        assert!(manifest.contains_key("build/b.js"));
    }

    #[tokio::test]
    async fn test_unreadable_entrypoint_is_sole_entry() {
        let (_dir, config) = fixture();
        let config = config.with_entrypoint(PathBuf::from("build/missing.js"));
        let manifest = build_manifest(&config).await;
        assert_eq!(manifest.len(), 1);
        assert!(manifest.contains_key("build/missing.js"));
    }

    #[tokio::test]
    async fn test_manifest_bounded_by_module_count() {
        let (dir, config) = fixture();
        for i in 0..5 {
            let next = (i + 1) % 5;
            std::fs::write(
                dir.path().join(format!("build/m{i}.js")),
                format!("import \"./m{next}.js\";\n"),
            )
            .unwrap();
        }

        let config = config.with_entrypoint(PathBuf::from("build/m0.js"));
        let manifest = build_manifest(&config).await;
        assert!(manifest.len() <= 5);
        assert_eq!(manifest.len(), 5);
    }
}
