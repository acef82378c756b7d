use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

/// Environment variable holding the log filter (same syntax as `RUST_LOG`)
pub const LOG_ENV: &str = "TD_LOG";

/// Install the global subscriber: human-readable lines on stderr, filtered by
/// `TD_LOG` (default `warn`). `verbose` raises the default to `debug`.
/// Calling it twice is harmless; the second call is ignored.
pub fn init(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let env_filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));

    let subscriber = tracing_subscriber::registry().with(env_filter).with(
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .without_time(),
    );

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
