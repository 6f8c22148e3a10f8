//! Helpers shared by the unit tests of this crate

use tracing_subscriber::EnvFilter;

/// Installs a test-friendly `tracing` subscriber once; filtering is controlled by `RUST_LOG`
pub(crate) fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
