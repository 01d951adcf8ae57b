//! Configuration for build-size
//!
//! This module provides:
//! - the optional `.build-size.toml` project file
//! - validation of caller-supplied inputs (directory, commit, label, PR, token)

pub mod file;
pub mod inputs;
pub mod loader;

pub use file::{ConfigFile, CONFIG_FILE_NAME, DEFAULT_CACHE_DIR, DEFAULT_REPORT_TITLE};
pub use inputs::{BuildInputs, ReportInputs};
pub use loader::ConfigLoader;
