use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_FILTER: &str = "info";

/// Install the global subscriber. `RUST_LOG` overrides the `info` default.
pub fn init_tracing() {
    init_tracing_with(None);
}

/// Install the global subscriber with explicit filter directives, deferring
/// to `RUST_LOG` when `directives` is `None`.
///
/// Logs go to stderr so documents written to stdout stay clean. Only the first
/// call installs a subscriber; later calls are ignored.
pub fn init_tracing_with(directives: Option<&str>) {
    let _ = tracing_subscriber::registry()
        .with(env_filter(directives))
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();
}

fn env_filter(directives: Option<&str>) -> EnvFilter {
    let parsed = match directives {
        Some(directives) => EnvFilter::try_new(directives).ok(),
        None => EnvFilter::try_from_default_env().ok(),
    };
    parsed.unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}
