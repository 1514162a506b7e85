//! The pack command: rewrite the tree, print the manifest.

use impack_core::PackConfig;
use miette::{IntoDiagnostic, Result};

/// Run a pack invocation to completion.
pub fn run(config: &PackConfig) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new().into_diagnostic()?;
    let rendered = runtime
        .block_on(async { impack_core::pack(config).await })
        .into_diagnostic()?;

    if !config.silent {
        println!("{rendered}");
    }

    Ok(())
}
