//! Diagnostic log setup.
//!
//! Everything goes to stderr so stdout stays clean for `compile-dotenv`.
//! Verbosity follows `RUST_LOG` (e.g. `RUST_LOG=debug`), defaulting to `info`.

use tracing_subscriber::EnvFilter;

/// Install the global subscriber.  Call once, first thing in `main`.
pub fn init() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
