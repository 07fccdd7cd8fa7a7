//! Process-wide tracing setup for hosts embedding the replenishment engine.

/// Tracing subscriber configuration (filters, formatters).
pub mod tracing;

/// Initialize JSON logging for the process, filtered by `RUST_LOG` (default `info`).
///
/// Safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init("info");
}

/// Initialize human-readable logging captured by the test harness.
pub fn init_for_tests() {
    tracing::init_test_writer("debug");
}
