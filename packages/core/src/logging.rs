use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize structured logging for the binary.
///
/// `RUST_LOG` wins when set. Otherwise dev mode logs at `debug` so the
/// pipeline's diagnostics are visible, and everything else at `info`.
pub fn init_logging(dev_mode: bool) {
    let default_level = if dev_mode { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();

    info!("Logging initialized (level: {})", default_level);
}
