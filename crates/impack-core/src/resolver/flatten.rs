//! Dependency flattening.
//!
//! A resolved target inside the external dependency store
//! (`./node_modules/`) is copied into the output tree once, so the packed
//! artifact is self-contained, and the specifier is rewritten to a relative
//! path from the importing file to the copied package.

use crate::probe;
use std::path::Path;
use tracing::{debug, warn};

/// Conventional prefix marking a target inside the external dependency store.
pub const STORE_PREFIX: &str = "./node_modules/";

/// Split `<name>/<file>` out of a store-relative module url, respecting
/// scoped `@scope/name` package naming.
pub(crate) fn split_package_target(module_url: &str) -> (String, String) {
    let mut segments = module_url.split('/');

    if module_url.starts_with('@') {
        let namespace = segments.next().unwrap_or_default();
        let scoped_name = segments.next().unwrap_or_default();
        let file = segments.collect::<Vec<_>>().join("/");
        (format!("{namespace}/{scoped_name}"), file)
    } else {
        let name = segments.next().unwrap_or_default().to_string();
        let file = segments.collect::<Vec<_>>().join("/");
        (name, file)
    }
}

/// Flatten a store target into the output tree and compute the rewritten
/// specifier for `containing_file`.
///
/// The package directory is copied under the output root exactly once (an
/// existing destination directory skips the copy). Copy failures are logged
/// and the rewritten specifier is still produced; a later pass can resolve
/// it once the tree is repaired.
pub(crate) async fn flatten_external(
    target: &str,
    containing_file: &str,
    cwd: &Path,
    directory: &str,
) -> String {
    let module_url = &target[STORE_PREFIX.len()..];
    let (module_name, file_name) = split_package_target(module_url);

    // Shift up one directory per level the importing file sits below the
    // output root.
    let rel = containing_file
        .strip_prefix(&format!("{directory}/"))
        .unwrap_or(containing_file);
    let depth = rel.split('/').count().saturating_sub(1);
    let mut src_shift = String::from(".");
    for _ in 0..depth {
        src_shift.push_str("/..");
    }

    let specifier = format!("{src_shift}/{module_name}/{file_name}");

    let destination = cwd.join(directory).join(&module_name);
    if !probe::is_dir(&destination).await {
        let source = cwd.join("node_modules").join(&module_name);
        debug!(
            package = %module_name,
            destination = %destination.display(),
            "flattening external dependency"
        );
        if let Err(err) = impack_util::fs::copy_dir_all(&source, &destination) {
            warn!(
                package = %module_name,
                %err,
                "failed to copy external dependency into output tree"
            );
        }
    }

    specifier
}
