//! Development-only log output.
//!
//! The library emits `tracing` events and never installs a subscriber on
//! its own. Binaries call `init_dev_logging` at startup; in release builds it
//! does nothing and every event is discarded.

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info";

/// Install a fmt subscriber filtered by `RUST_LOG` (default `info`) when
/// built with debug assertions. Returns whether a subscriber was installed.
/// Safe to call more than once.
pub fn init_dev_logging() -> bool {
    if !cfg!(debug_assertions) {
        return false;
    }
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .is_ok()
}
