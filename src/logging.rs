// ==========================================
// TSMX Customer Import - Logging Setup
// ==========================================
// tracing + tracing-subscriber, level taken
// from the environment.
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

/// Initialize the process-wide subscriber.
///
/// # Environment
/// - RUST_LOG: filter expression (default: info),
///   e.g. RUST_LOG=debug or RUST_LOG=tsmx_import=trace
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(true)
        .init();
}

/// Subscriber for tests: verbose, writer captured per test.
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
