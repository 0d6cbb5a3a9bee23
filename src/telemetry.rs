//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

use crate::config::ServerConfig;

/// Installs the global subscriber.
///
/// `RUST_LOG` wins over `server.log_level`. Production logs are JSON, other
/// environments get the human-readable format. Safe to call more than once;
/// later calls are no-ops.
pub fn init(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&server.log_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let _ = if server.is_production() {
        builder.json().with_current_span(false).try_init()
    } else {
        builder.try_init()
    };
}
