// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Shared setup for the platform integration tests.
//!
//! This module is **not** a test file, so it must comply with full clippy rules.

use tracing_subscriber::EnvFilter;

/// Route `tracing` output into the test harness.
///
/// Honors `RUST_LOG`; defaults to `lona_platform=debug`. Safe to call from
/// every test, only the first call installs the subscriber.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("lona_platform=debug"));
    // Another test in this binary may have installed it already.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}
