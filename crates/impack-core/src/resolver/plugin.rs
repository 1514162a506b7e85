//! External resolver plugins.
//!
//! Callers can inject resolution strategies the import map cannot express
//! (framework aliases, virtual modules). Plugins are tried in registration
//! order; the first result whose id differs from the input specifier wins,
//! ahead of the default `.js`/`/index.js` probing.

/// Result of a plugin resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedId {
    /// Resolved specifier (usually a working-directory-relative path).
    pub id: String,
}

impl ResolvedId {
    /// Create a resolved specifier result.
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// A pluggable specifier resolver.
pub trait ResolverPlugin: Send + Sync {
    /// Plugin name for debugging and log messages.
    fn name(&self) -> &str;

    /// Resolve a specifier to an id.
    ///
    /// `importer` is the file containing the specifier, relative to the
    /// working directory; `is_entry` is set when that file is the configured
    /// entrypoint. Return `Some` to handle this resolution, or `None` to let
    /// the next plugin or the default resolution take over.
    fn resolve_id(
        &self,
        specifier: &str,
        importer: Option<&str>,
        is_entry: bool,
    ) -> Option<ResolvedId>;
}

/// Plugin for path aliasing.
///
/// Maps import paths like `@app/components` to `./build/components`.
pub struct AliasPlugin {
    aliases: Vec<(String, String)>,
}

impl AliasPlugin {
    /// Create a new alias plugin.
    #[must_use]
    pub fn new() -> Self {
        Self {
            aliases: Vec::new(),
        }
    }

    /// Add an alias.
    #[must_use]
    pub fn alias(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.aliases.push((from.into(), to.into()));
        self
    }
}

impl Default for AliasPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl ResolverPlugin for AliasPlugin {
    fn name(&self) -> &str {
        "alias"
    }

    fn resolve_id(
        &self,
        specifier: &str,
        _importer: Option<&str>,
        _is_entry: bool,
    ) -> Option<ResolvedId> {
        for (from, to) in &self.aliases {
            if specifier == from {
                return Some(ResolvedId::new(to));
            }
            if let Some(rest) = specifier.strip_prefix(from.as_str()) {
                if rest.starts_with('/') {
                    return Some(ResolvedId::new(format!("{to}{rest}")));
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alias_plugin_exact_match() {
        let plugin = AliasPlugin::new().alias("@app", "./build/app");
        let result = plugin.resolve_id("@app", None, false);
        assert_eq!(result.unwrap().id, "./build/app");
    }

    #[test]
    fn test_alias_plugin_prefix_match() {
        let plugin = AliasPlugin::new().alias("@app", "./build/app");
        let result = plugin.resolve_id("@app/env", Some("build/main.js"), false);
        assert_eq!(result.unwrap().id, "./build/app/env");
    }

    #[test]
    fn test_alias_plugin_no_partial_segment_match() {
        let plugin = AliasPlugin::new().alias("@app", "./build/app");
        assert!(plugin.resolve_id("@apple/core", None, false).is_none());
    }

    #[test]
    fn test_alias_plugin_order() {
        let plugin = AliasPlugin::new()
            .alias("@", "./first")
            .alias("@", "./second");
        let result = plugin.resolve_id("@/x", None, false);
        assert_eq!(result.unwrap().id, "./first/x");
    }
}
