//! Stat-based existence probes.
//!
//! Every other component decides extension fallbacks and copy idempotence
//! through these two checks. Errors (missing file, permission denied)
//! collapse to `false`.

use std::path::Path;

/// Check whether `path` names an existing regular file.
pub async fn is_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .is_ok_and(|m| m.is_file())
}

/// Check whether `path` names an existing directory.
pub async fn is_dir(path: &Path) -> bool {
    tokio::fs::metadata(path).await.is_ok_and(|m| m.is_dir())
}
