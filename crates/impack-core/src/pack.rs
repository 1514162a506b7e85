//! Pack orchestration.
//!
//! Load the import map, rewrite the tree to a fixed point, build the
//! manifest, emit. Printing is the caller's decision.

use crate::config::PackConfig;
use crate::emit;
use crate::error::Error;
use crate::graph;
use crate::import_map::ImportMap;
use crate::resolver::Resolver;
use crate::rewrite::{self, RewriteSession};
use tracing::{debug, warn};

/// Run a full pack invocation and return the rendered manifest text.
pub async fn pack(config: &PackConfig) -> Result<String, Error> {
    if config.extract_services {
        warn!("service extraction requires a script host, skipping");
    }

    let import_map = match &config.import_map {
        Some(path) => ImportMap::load(&config.cwd.join(path)).await,
        None => ImportMap::default(),
    };
    debug!(entries = import_map.len(), "import map loaded");

    let resolver = Resolver::new(config, &import_map);
    let mut session = RewriteSession::new();
    rewrite::rewrite_all(config, &resolver, &mut session).await?;
    debug!(
        files = session.processed_count(),
        "tree rewriting converged"
    );

    let manifest = graph::build_manifest(config).await;
    debug!(modules = manifest.len(), "manifest built");

    if config.structured_output() {
        let template = match &config.template {
            Some(path) => tokio::fs::read_to_string(config.cwd.join(path)).await.ok(),
            None => None,
        };
        Ok(emit::emit_structured(&manifest, template.as_deref()))
    } else {
        Ok(emit::emit_json(&manifest))
    }
}
