//! Logging setup.
//!
//! Library code only emits `tracing` events; installing a subscriber is up
//! to the binary (or the test harness).

use tracing_subscriber::{fmt, EnvFilter};

/// Installs the global subscriber.
///
/// The filter comes from `RUST_LOG` (default: `info`), e.g.
/// `RUST_LOG=u_league=debug` or `RUST_LOG=u_league::scheduler=trace`.
/// Output goes to stderr so stdout stays free for the JSON response.
///
/// # Example
/// ```no_run
/// u_league::logging::init();
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .init();
}

/// Installs a debug-level subscriber that writes through the test harness.
///
/// Safe to call from several tests; only the first call installs.
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
