//! Tracing/logging bootstrap shared by skillgrid processes and test
//! harnesses.

use tracing_subscriber::EnvFilter;

/// Initialize process-wide tracing.
///
/// Filter comes from `RUST_LOG`, defaulting to `info`. Safe to call multiple
/// times (subsequent calls are no-ops), so test binaries can call it from
/// every test.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .try_init();
}
