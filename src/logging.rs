//! Tracing subscriber setup for the binary and the API server.

use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

/// Installs a global `fmt` subscriber writing to stderr.
///
/// `RUST_LOG` takes precedence; otherwise events at `default_level` and
/// above are emitted.
///
/// # Errors
///
/// Fails if a global subscriber is already installed.
pub fn init_logging(
    default_level: Level,
) -> Result<(), tracing_subscriber::util::TryInitError> {
    let env_filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
}
