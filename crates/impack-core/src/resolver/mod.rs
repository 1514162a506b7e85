//! Specifier resolution.
//!
//! Turns the raw specifier found in a module file into its final, rewritten
//! form. Precedence, in order: exact import-map lookup, package subpath
//! imports (`#`), external resolver plugins, builtin/`#` passthrough,
//! dependency flattening, relative rebasing, and `.js`//`index.js` probing.
//! Resolution is iterated until a call returns its input unchanged, because
//! a mapped target may itself be an alias needing another round.

mod flatten;
mod plugin;

pub use plugin::{AliasPlugin, ResolvedId, ResolverPlugin};

use crate::config::PackConfig;
use crate::import_map::{find_package_subpath_import, ImportMap};
use crate::paths::{self, strip_dot_prefix};
use crate::probe;
use std::path::Path;
use tracing::{debug, warn};

/// Reserved prefix for runtime-builtin modules, satisfied by the host.
pub const BUILTIN_PREFIX: &str = "node:";

/// Defensive bound on resolution rounds; each round either settles or
/// strictly normalizes toward an existing path, so this is never reached by
/// well-formed inputs.
const MAX_ROUNDS: usize = 16;

/// Resolution context for one pack invocation.
///
/// Carries exactly the data dependencies resolution needs: the working
/// directory, the output directory, the loaded import map, the plugin list,
/// and the configured entrypoint.
pub struct Resolver<'a> {
    cwd: &'a Path,
    directory: String,
    import_map: &'a ImportMap,
    plugins: &'a [Box<dyn ResolverPlugin>],
    entrypoint: Option<String>,
}

impl<'a> Resolver<'a> {
    /// Build a resolver from the pack configuration and a loaded import map.
    #[must_use]
    pub fn new(config: &'a PackConfig, import_map: &'a ImportMap) -> Self {
        Self {
            cwd: &config.cwd,
            directory: paths::normalize(strip_dot_prefix(&paths::to_slash(&config.directory))),
            import_map,
            plugins: &config.plugins,
            entrypoint: config
                .entrypoint
                .as_ref()
                .map(|e| paths::normalize(strip_dot_prefix(&paths::to_slash(e)))),
        }
    }

    /// Resolve `raw` as found in `containing_file` (a working-directory-
    /// relative slash path) to its final specifier.
    ///
    /// Iterates until a round returns its input unchanged.
    pub async fn resolve(&self, raw: &str, containing_file: &str) -> String {
        let mut current = raw.to_string();
        for _ in 0..MAX_ROUNDS {
            let next = self.resolve_once(&current, containing_file).await;
            if next == current {
                return current;
            }
            current = next;
        }
        warn!(
            specifier = raw,
            file = containing_file,
            "specifier resolution did not settle; keeping best-effort candidate"
        );
        current
    }

    async fn resolve_once(&self, specifier: &str, containing_file: &str) -> String {
        // 1. Exact import-map lookup.
        let mut candidate = self.import_map.get(specifier).map(str::to_string);

        // 2. Package subpath imports, nearest manifest first.
        if candidate.is_none() && specifier.starts_with('#') {
            let start = self.cwd.join(paths::dir_of(containing_file));
            candidate = find_package_subpath_import(specifier, &start, self.cwd).await;
        }

        // 3. External resolver plugins, in registration order.
        if candidate.is_none() {
            let is_entry = self.entrypoint.as_deref() == Some(containing_file);
            for plugin in self.plugins {
                if let Some(resolved) =
                    plugin.resolve_id(specifier, Some(containing_file), is_entry)
                {
                    if resolved.id != specifier {
                        debug!(
                            plugin = plugin.name(),
                            specifier,
                            id = %resolved.id,
                            "plugin resolved specifier"
                        );
                        candidate = Some(resolved.id);
                        break;
                    }
                }
            }
        }

        // 4. Unresolved builtins and package imports are the host's problem.
        if candidate.is_none()
            && (specifier.starts_with(BUILTIN_PREFIX) || specifier.starts_with('#'))
        {
            return specifier.to_string();
        }

        // 5./6. Flatten store targets; rebase other relative targets onto
        // the importing file.
        let url = match candidate {
            Some(target) if target.starts_with(flatten::STORE_PREFIX) => {
                flatten::flatten_external(&target, containing_file, self.cwd, &self.directory)
                    .await
            }
            Some(target) if target.starts_with("./") || target.starts_with("../") => {
                paths::rebase(&target, containing_file)
            }
            Some(target) => target,
            None => specifier.to_string(),
        };

        // 7. Extension resolution: as-is, then `.js`, then `/index.js`.
        self.probe_extensions(url, containing_file).await
    }

    async fn probe_extensions(&self, url: String, containing_file: &str) -> String {
        let dir = paths::dir_of(containing_file);

        let as_is = self.cwd.join(paths::join(dir, &url));
        if probe::is_file(&as_is).await {
            return url;
        }

        let with_js = self.cwd.join(paths::join(dir, &format!("{url}.js")));
        if probe::is_file(&with_js).await {
            return format!("{url}.js");
        }

        let with_index = self.cwd.join(paths::join(dir, &format!("{url}/index.js")));
        if probe::is_file(&with_index).await {
            return format!("{url}/index.js");
        }

        // Nothing exists yet; a later pass (after flattening) may make the
        // candidate resolvable.
        url
    }
}
