//! Shared helpers for the integration tests of the `chairs` workspace.

pub mod logging;
