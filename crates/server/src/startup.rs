use std::net::SocketAddr;

use axum::Router;
use configs::{AppConfig, StorageBackend};
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::routes;
use crate::state::AppState;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(cfg: &AppConfig) -> anyhow::Result<SocketAddr> {
    Ok(format!("{}:{}", cfg.server.host, cfg.server.port).parse()?)
}

/// Build the app from configuration.
pub async fn build_app(cfg: &AppConfig) -> anyhow::Result<Router> {
    // the memory backend never touches disk
    let data_dir = match cfg.storage.backend {
        StorageBackend::File => cfg.storage.data_dir(),
        StorageBackend::Memory => None,
    };
    common::env::ensure_env(&cfg.server.static_dir, data_dir).await?;

    let storage_cfg = cfg.storage.clone();
    let backend = tokio::task::spawn_blocking(move || service::storage::open_backend(&storage_cfg)).await??;
    let state = AppState::new(backend);

    Ok(routes::build_router(state, build_cors(), &cfg.server.static_dir))
}

/// Public entry: build the app and run the HTTP server.
/// Config loading and logging setup belong to the caller.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let app = build_app(&cfg).await?;

    let addr = bind_addr(&cfg)?;
    info!(%addr, static_dir = %cfg.server.static_dir, "starting bookmarks server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_addr_from_config() -> anyhow::Result<()> {
        let cfg = AppConfig::default();
        assert_eq!(bind_addr(&cfg)?, "127.0.0.1:8080".parse::<SocketAddr>()?);
        Ok(())
    }

    #[test]
    fn bind_addr_rejects_hostname() {
        let mut cfg = AppConfig::default();
        cfg.server.host = "not a host".into();
        assert!(bind_addr(&cfg).is_err());
    }
}
