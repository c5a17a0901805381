#![cfg(test)]

//! Test logging for the unit tests inside this crate.
//!
//! Integration tests use `chairs_test_support::logging` instead; both read
//! the same variables so a single `TEST_LOG=debug` covers a whole run.

use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

static INITIALIZED: OnceCell<()> = OnceCell::new();

/// Install a test subscriber once per process.
///
/// The filter comes from `TEST_LOG`, then `RUST_LOG`, then defaults to
/// `"warn"`. Thread names are shown since every player runs on its own.
pub fn init() {
    INITIALIZED.get_or_init(|| {
        let filter = std::env::var("TEST_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .map(EnvFilter::new)
            .unwrap_or_else(|_| EnvFilter::new("warn"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_thread_names(true)
            .without_time()
            .try_init()
            .ok();
    });
}
