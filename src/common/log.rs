//! Logging set-up emitting JSON lines.
//!
//! Events carry the `ev`, `code` and `dur_us` fields; `ts`, `level` and the
//! module target are added by the formatter.

use tracing_subscriber::EnvFilter;

/// Install the global JSON subscriber. Safe to call more than once; later calls are no-ops.
pub fn init(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .json()
        .with_current_span(false)
        .with_target(true)
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .try_init();
}
