//! Tracing setup for the wellness binaries.
//!
//! The engine only emits events. Binaries install a subscriber once at
//! startup; reports go to stdout, so every event goes to stderr.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Default filter for a count of `-v` flags
///
/// Quiet by default so piped JSON stays clean. One flag shows report
/// summaries and sweep progress; two or more trace metric computation.
pub fn filter_for_verbosity(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "wellness_core=info,warn",
        _ => "wellness_core=debug,info",
    }
}

/// Install the stderr subscriber for `verbosity`
///
/// `RUST_LOG`, when set, wins over the verbosity flags.
pub fn init(verbosity: u8) {
    init_with_level(filter_for_verbosity(verbosity))
}

/// Install the stderr subscriber with an explicit default filter
pub fn init_with_level(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .init();
}

/// Route events to the test harness's captured output
#[cfg(test)]
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(EnvFilter::new("wellness_core=debug"))
        .try_init();
}
