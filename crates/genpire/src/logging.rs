//! Tracing/logging bootstrap for embedding binaries.

use tracing_log::LogTracer;
use tracing_subscriber::{fmt, EnvFilter};

/// Installs the global tracing subscriber and routes `log` macros into
/// it. Filter defaults to `info` and is overridable via `RUST_LOG`.
///
/// Safe to call more than once; only the first call installs.
pub fn init() {
    let _ = LogTracer::init();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        log::debug!("Tracing subscriber already installed");
    }
}
