//! Test fixtures and environment helpers.

use once_cell::sync::OnceCell;
use tracing_subscriber::{EnvFilter, fmt};

static TEST_LOGGING: OnceCell<()> = OnceCell::new();

/// Install a test-writer tracing subscriber once per process.
///
/// Honours `RUST_LOG`; defaults to `debug` so failing tests show the queue and
/// router transitions that led up to the failure.
pub fn init_test_logging() {
    TEST_LOGGING.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
        let _ = fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(false)
            .try_init();
    });
}
