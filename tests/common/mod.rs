//! Common test utilities and helpers
//!
//! This module provides shared functionality for integration tests:
//! - The binary under test
//! - Project fixtures with client configs, payload dumps and reports
//!
//! # Usage
//!
//! ```rust,no_run
//! mod common;
//! use common::{fixtures, get_bin};
//!
//! fn test_clients() {
//!     let project = fixtures::create_project().unwrap();
//!     get_bin().arg("--root").arg(project.path()).arg("clients").assert().success();
//! }
//! ```

pub mod fixtures;

use assert_cmd::Command;

/// The traffic-audit binary, with emoji disabled for stable output
#[allow(dead_code)]
pub fn get_bin() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_traffic-audit"));
    cmd.env("NO_EMOJI", "1").env_remove("RUST_LOG");
    cmd
}

/// Parse a command's stdout as JSON
#[allow(dead_code)]
pub fn stdout_json(output: &std::process::Output) -> serde_json::Value {
    let stdout = String::from_utf8(output.stdout.clone()).expect("Failed to parse stdout as UTF-8");
    serde_json::from_str(&stdout)
        .unwrap_or_else(|e| panic!("stdout is not valid JSON ({}): {}", e, stdout))
}
