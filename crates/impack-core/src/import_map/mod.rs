//! External specifier→target mapping.
//!
//! The import map drives rewriting: a key matching a raw specifier replaces
//! it with the mapped target before any probing happens. Loading fails soft
//! so the tool runs importless by default.

mod subpath;

pub use subpath::find_package_subpath_import;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// Specifier→target mapping, as loaded from an import-map JSON file.
///
/// Mutated only by [`ImportMap::merge`]; read-only during a resolution pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportMap {
    #[serde(default)]
    pub imports: HashMap<String, String>,
}

impl ImportMap {
    /// Load an import map from a JSON file.
    ///
    /// A missing or unparseable file yields the empty map rather than an
    /// error: the tool must run without an import map present.
    pub async fn load(path: &Path) -> Self {
        let contents = match tokio::fs::read_to_string(path).await {
            Ok(contents) => contents,
            Err(err) => {
                debug!(path = %path.display(), %err, "no import map loaded");
                return Self::default();
            }
        };

        match serde_json::from_str::<Self>(&contents) {
            Ok(map) => map,
            Err(err) => {
                debug!(path = %path.display(), %err, "import map unparseable, using empty map");
                Self::default()
            }
        }
    }

    /// Overlay another map onto this one; keys from `other` win.
    pub fn merge(&mut self, other: Self) {
        self.imports.extend(other.imports);
    }

    /// Exact-key lookup.
    #[must_use]
    pub fn get(&self, specifier: &str) -> Option<&str> {
        self.imports.get(specifier).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.imports.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.imports.is_empty()
    }
}
