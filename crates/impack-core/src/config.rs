use crate::resolver::ResolverPlugin;
use std::path::PathBuf;

/// Immutable configuration for one pack invocation.
///
/// Constructed once, never mutated afterward. Paths are interpreted
/// relative to `cwd` unless absolute.
pub struct PackConfig {
    /// Working directory all relative paths hang off.
    pub cwd: PathBuf,

    /// Output directory holding the compiled module tree.
    pub directory: PathBuf,

    /// Import-map JSON file. Missing or malformed files load as empty.
    pub import_map: Option<PathBuf>,

    /// Entrypoint module; when set, the manifest is its transitive closure.
    pub entrypoint: Option<PathBuf>,

    /// Worker config template to splice the module list into.
    pub template: Option<PathBuf>,

    /// Emit the structured module-list format instead of JSON.
    pub capnp: bool,

    /// Suppress manifest output on stdout.
    pub silent: bool,

    /// Experimental service extraction; requires a script host and is
    /// currently skipped with a warning.
    pub extract_services: bool,

    /// External resolver plugins, tried in registration order.
    pub plugins: Vec<Box<dyn ResolverPlugin>>,
}

impl PackConfig {
    /// Create a config for the given working directory and output directory.
    #[must_use]
    pub fn new(cwd: PathBuf, directory: PathBuf) -> Self {
        Self {
            cwd,
            directory,
            import_map: None,
            entrypoint: None,
            template: None,
            capnp: false,
            silent: false,
            extract_services: false,
            plugins: Vec::new(),
        }
    }

    /// Set the import-map file path.
    #[must_use]
    pub fn with_import_map(mut self, path: PathBuf) -> Self {
        self.import_map = Some(path);
        self
    }

    /// Set the entrypoint module path.
    #[must_use]
    pub fn with_entrypoint(mut self, path: PathBuf) -> Self {
        self.entrypoint = Some(path);
        self
    }

    /// Set the worker config template path (implies structured emission).
    #[must_use]
    pub fn with_template(mut self, path: PathBuf) -> Self {
        self.template = Some(path);
        self
    }

    /// Request the structured module-list emission format.
    #[must_use]
    pub fn with_capnp(mut self, capnp: bool) -> Self {
        self.capnp = capnp;
        self
    }

    /// Suppress stdout output.
    #[must_use]
    pub fn with_silent(mut self, silent: bool) -> Self {
        self.silent = silent;
        self
    }

    /// Accept the experimental service-extraction flag.
    #[must_use]
    pub fn with_extract_services(mut self, extract: bool) -> Self {
        self.extract_services = extract;
        self
    }

    /// Register an external resolver plugin.
    #[must_use]
    pub fn with_plugin(mut self, plugin: Box<dyn ResolverPlugin>) -> Self {
        self.plugins.push(plugin);
        self
    }

    /// Whether structured emission is requested (flag or template present).
    #[must_use]
    pub fn structured_output(&self) -> bool {
        self.capnp || self.template.is_some()
    }
}

impl std::fmt::Debug for PackConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PackConfig")
            .field("cwd", &self.cwd)
            .field("directory", &self.directory)
            .field("import_map", &self.import_map)
            .field("entrypoint", &self.entrypoint)
            .field("template", &self.template)
            .field("capnp", &self.capnp)
            .field("silent", &self.silent)
            .field("extract_services", &self.extract_services)
            .field(
                "plugins",
                &self.plugins.iter().map(|p| p.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}
