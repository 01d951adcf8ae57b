//! Test fixture helpers for creating build workspaces
//!
//! A workspace is a temporary working directory with a `dist/` build output
//! and, once a snapshot is taken, a `.build-size-cache/` cache directory.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Build output directory name used by the fixtures
pub const BUILD_DIR: &str = "dist";

/// Temporary working directory for one test
pub struct Workspace {
    temp_dir: TempDir,
}

impl Workspace {
    /// Create an empty workspace
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self {
            temp_dir: TempDir::new()?,
        })
    }

    /// Workspace root, used as the working directory of the binary
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Path of the build output directory
    pub fn build_dir(&self) -> PathBuf {
        self.path().join(BUILD_DIR)
    }

    /// Replace the build output with files of the given sizes
    pub fn write_build(&self, files: &[(&str, usize)]) -> anyhow::Result<()> {
        let dir = self.build_dir();
        if dir.exists() {
            fs::remove_dir_all(&dir)?;
        }
        for (name, size) in files {
            let path = dir.join(name);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, vec![b'w'; *size])?;
        }
        fs::create_dir_all(&dir)?;
        Ok(())
    }

    /// Write a `.build-size.toml` into the workspace
    pub fn write_config(&self, contents: &str) -> anyhow::Result<()> {
        fs::write(self.path().join(".build-size.toml"), contents)?;
        Ok(())
    }

    /// Number of committed entries in the default local cache
    pub fn cached_entries(&self) -> usize {
        let entries = self.path().join(".build-size-cache").join("entries");
        fs::read_dir(entries)
            .map(|dir| {
                dir.filter_map(Result::ok)
                    .filter(|e| e.path().join("entry.json").exists())
                    .count()
            })
            .unwrap_or(0)
    }
}
