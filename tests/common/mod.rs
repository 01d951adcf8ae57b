//! Common test utilities and helpers
//!
//! This module provides shared functionality for integration tests:
//! - the `build-size` binary with a scrubbed environment
//! - temporary workspaces holding a build directory and a snapshot cache
//!
//! # Usage
//!
//! ```rust,no_run
//! mod common;
//! use common::{bin, fixtures::Workspace};
//!
//! fn test_snapshot() {
//!     let ws = Workspace::new().unwrap();
//!     ws.write_build(&[("app.js", 100)]).unwrap();
//!     bin(&ws).args(["snapshot", "--dir", "dist"]).assert().success();
//! }
//! ```

pub mod fixtures;

use assert_cmd::Command;

/// Environment variables the CLI reads as input fallbacks
const INPUT_ENV_VARS: &[&str] = &[
    "BUILD_SIZE_DIR",
    "BUILD_SIZE_LABEL",
    "BUILD_SIZE_PR",
    "BUILD_SIZE_CACHE_DIR",
    "GITHUB_SHA",
    "GITHUB_TOKEN",
    "GITHUB_REPOSITORY",
];

/// The build-size binary, run inside `ws` with no input variables inherited
#[allow(dead_code)]
pub fn bin(ws: &fixtures::Workspace) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_build-size"));
    for var in INPUT_ENV_VARS {
        cmd.env_remove(var);
    }
    cmd.env("RUST_LOG", "info").current_dir(ws.path());
    cmd
}

/// Check if running in CI environment
#[allow(dead_code)]
pub fn is_ci() -> bool {
    std::env::var("CI").is_ok() || std::env::var("GITHUB_ACTIONS").is_ok()
}
