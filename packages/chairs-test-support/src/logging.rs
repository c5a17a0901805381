//! One-time test subscriber for integration test binaries.

use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

static INITIALIZED: OnceCell<()> = OnceCell::new();

/// Initialize logging for an integration test binary.
///
/// Safe to call any number of times from any thread. The level comes from
/// `TEST_LOG`, then `RUST_LOG`, and is `"warn"` otherwise. Set
/// `TEST_LOG_JSON=1` to get one JSON object per line, which is easier to grep
/// when a game with many player threads misbehaves.
pub fn init() {
    INITIALIZED.get_or_init(|| {
        let filter = std::env::var("TEST_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .map(EnvFilter::new)
            .unwrap_or_else(|_| EnvFilter::new("warn"));
        let json = std::env::var("TEST_LOG_JSON").is_ok_and(|v| v == "1");

        let builder = fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_thread_names(true)
            .without_time();

        if json {
            builder.json().try_init().ok();
        } else {
            builder.try_init().ok();
        }
        tracing::trace!(json, "Test logging installed");
    });
}
