use std::io;
use tracing_subscriber::{fmt, EnvFilter};

/// Used when `RUST_LOG` is unset. `RUST_LOG=info,service::bookmarks=debug`
/// also logs every save.
pub const DEFAULT_FILTER: &str = "info,tower_http=info,axum=info";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber, writing to stdout.
/// `json` switches from the compact human format to one JSON object per line.
/// Safe to call more than once; later calls are no-ops.
pub fn init_logging(json: bool) {
    let builder = fmt()
        .with_env_filter(env_filter())
        .with_target(false)
        .with_writer(io::stdout);
    let _ = if json {
        builder.json().try_init()
    } else {
        builder.compact().try_init()
    };
}
