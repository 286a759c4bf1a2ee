use dotenvy::dotenv;
use tracing::{error, info, warn};
use uuid::Uuid;

fn load_config() -> configs::AppConfig {
    match configs::AppConfig::load_or_default() {
        Ok(cfg) => {
            common::utils::logging::init_logging(cfg.logging.json);
            cfg
        }
        Err(e) => {
            // fall back to defaults so the process can still report what went wrong
            common::utils::logging::init_logging(false);
            warn!(service = "server", event = "config_invalid", error = %e, "using default configuration");
            configs::AppConfig::default()
        }
    }
}

fn main() -> std::process::ExitCode {
    // .env first, so RUST_LOG / CONFIG_PATH / STORAGE_PATH take effect
    dotenv().ok();
    let cfg = load_config();
    info!(service = "server", event = "logger_init", json = cfg.logging.json, "tracing subscriber initialized");

    // Basic service context (no secrets)
    let service_id = Uuid::new_v4();
    let pid = std::process::id();
    let version = env!("CARGO_PKG_VERSION");

    std::panic::set_hook(Box::new({
        let service_id = service_id;
        move |info| {
            error!(
                service = "server",
                event = "panic",
                %service_id,
                pid,
                message = %info,
                "unhandled panic occurred"
            );
        }
    }));

    let worker_threads = cfg.server.worker_threads;
    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(w) = worker_threads { builder.worker_threads(w); }

    let rt = match builder.build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(service = "server", event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return std::process::ExitCode::FAILURE;
        }
    };

    info!(
        service = "server",
        event = "start",
        %service_id,
        pid,
        version,
        threads = worker_threads.unwrap_or_default(),
        storage = %cfg.storage.path,
        "bookmarks server starting"
    );

    rt.block_on(async move {
        let server_task = tokio::spawn(server::run(cfg));

        tokio::select! {
            res = server_task => {
                match res {
                    Ok(Ok(())) => {
                        info!(service = "server", event = "stop", %service_id, pid, "server stopped normally");
                        std::process::ExitCode::SUCCESS
                    }
                    Ok(Err(e)) => {
                        error!(service = "server", event = "run_failed", error = %e, "server returned error");
                        std::process::ExitCode::FAILURE
                    }
                    Err(e) => {
                        error!(service = "server", event = "task_join_error", error = %e, "server task join error");
                        std::process::ExitCode::FAILURE
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                // every write is complete before its request returns, so nothing to flush
                info!(service = "server", event = "shutdown_signal", %service_id, pid, "received Ctrl+C, shutting down");
                std::process::ExitCode::SUCCESS
            }
        }
    })
}
