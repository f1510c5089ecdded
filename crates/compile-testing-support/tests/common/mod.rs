// crates/compile-testing-support/tests/common/mod.rs
// =============================================================================
// Module: Support Test Helpers
// Description: Shared helpers for compile-testing-support integration tests.
// Purpose: Reduce duplication across suites.
// =============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]

use std::fs;
use std::path::Path;

use compile_testing_support::ProcessEnv;

/// Installs a test-writer tracing subscriber once per test binary.
///
/// Reading `RUST_LOG` is an environment access, so it happens under the
/// process env lock. Do not call this while already holding that lock.
pub fn init_tracing() {
    let _lock = ProcessEnv::lock();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Writes `content` to `path`, creating parent directories.
pub fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}
