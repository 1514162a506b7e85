//! Tree rewriting.
//!
//! Scans the output directory for module files and replaces every matched
//! specifier with the resolver's output. The outer loop re-scans until a
//! pass discovers no unseen files, because dependency flattening performed
//! while rewriting one file can introduce new files that need rewriting too.

pub mod scan;

use crate::config::PackConfig;
use crate::error::Error;
use crate::paths;
use crate::resolver::Resolver;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, warn};

/// Per-invocation rewrite state.
///
/// The processed set is carried explicitly so separate invocations stay
/// independent; a file is rewritten at most once per session even across
/// passes.
#[derive(Debug, Default)]
pub struct RewriteSession {
    processed: HashSet<String>,
}

impl RewriteSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of files rewritten so far in this session.
    #[must_use]
    pub fn processed_count(&self) -> usize {
        self.processed.len()
    }
}

/// Rewrite every module file under the configured output directory, to a
/// fixed point.
///
/// Files are processed strictly one at a time: a later file may depend on a
/// flattening side effect performed by an earlier one in the same pass.
pub async fn rewrite_all(
    config: &PackConfig,
    resolver: &Resolver<'_>,
    session: &mut RewriteSession,
) -> Result<(), Error> {
    let root = config.cwd.join(&config.directory);

    loop {
        let files = impack_util::fs::find_module_files(&root);
        let mut any_processed = false;

        for file in files {
            let rel = relative_key(&config.cwd, &file);
            if session.processed.contains(&rel) {
                continue;
            }
            process_file(&file, &rel, resolver).await?;
            session.processed.insert(rel);
            any_processed = true;
        }

        if !any_processed {
            break;
        }
        debug!(
            processed = session.processed_count(),
            "rewrite pass complete, re-scanning for new files"
        );
    }

    Ok(())
}

/// Working-directory-relative slash path used as the file's identity.
fn relative_key(cwd: &Path, file: &Path) -> String {
    let rel = file.strip_prefix(cwd).unwrap_or(file);
    paths::normalize(&paths::to_slash(rel))
}

async fn process_file(path: &Path, rel: &str, resolver: &Resolver<'_>) -> Result<(), Error> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| Error::ModuleRead {
            path: path.to_path_buf(),
            source,
        })?;
    let initial = String::from_utf8_lossy(&bytes).into_owned();

    let statements: Vec<String> = scan::find_statements(&initial)
        .map(str::to_string)
        .collect();
    if statements.is_empty() {
        return Ok(());
    }

    let mut contents = initial.clone();
    for statement in &statements {
        let Some(specifier) = scan::extract_specifier(statement) else {
            continue;
        };
        let replacement = resolver.resolve(specifier, rel).await;
        if replacement == specifier {
            continue;
        }
        let rewritten = statement.replacen(specifier, &replacement, 1);
        contents = contents.replacen(statement.as_str(), &rewritten, 1);
    }

    if contents != initial {
        if let Err(err) = impack_util::fs::atomic_write(path, contents.as_bytes()) {
            warn!(file = rel, %err, "failed to write rewritten module, continuing");
        }
    }

    Ok(())
}
