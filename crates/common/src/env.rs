//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected directories exist at startup.

use tracing::warn;

/// Warn when the front-end build is missing; create the data directory if needed.
pub async fn ensure_env(static_dir: &str, data_dir: Option<&std::path::Path>) -> anyhow::Result<()> {
    if tokio::fs::metadata(static_dir).await.is_err() {
        warn!(%static_dir, "front-end assets directory not found; static assets may 404");
    }
    if let Some(dir) = data_dir {
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", dir.display()))?;
    }
    Ok(())
}
