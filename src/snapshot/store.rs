//! Snapshot persistence on top of the artifact cache

use super::meta::SnapshotMeta;
use super::sizes::BuildSizes;
use crate::cache::CacheService;
use crate::infra::{FileSystem, RealFileSystem};
use anyhow::{Context, Result};
use log::{info, warn};
use std::path::{Path, PathBuf};

/// Which key, if any, a fallback restore matched
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// The snapshot of this exact commit was restored
    Exact,
    /// A snapshot of another commit with the same label was restored
    Fallback(String),
    /// Nothing was restored; compare against an empty baseline
    Missing,
}

impl RestoreOutcome {
    /// True when no prior snapshot is available
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }
}

/// Result of persisting a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistOutcome {
    /// The snapshot was saved under its exact key
    Saved,
    /// A concurrent run already saved this key; nothing was written
    AlreadyCached,
}

/// Snapshot restore/save semantics for the producer and reporter pipelines
pub struct SnapshotStore<C: CacheService, FS: FileSystem = RealFileSystem> {
    cache: C,
    fs: FS,
    workdir: PathBuf,
}

impl<C: CacheService> SnapshotStore<C, RealFileSystem> {
    /// Create a store resolving snapshot files against `workdir`
    pub fn new(cache: C, workdir: &Path) -> Self {
        Self::with_fs(cache, workdir, RealFileSystem)
    }
}

impl<C: CacheService, FS: FileSystem> SnapshotStore<C, FS> {
    /// Create a store with a custom filesystem implementation
    pub fn with_fs(cache: C, workdir: &Path, fs: FS) -> Self {
        Self {
            cache,
            fs,
            workdir: workdir.to_path_buf(),
        }
    }

    /// Local path of the snapshot payload
    pub fn payload_path(&self, meta: &SnapshotMeta) -> PathBuf {
        self.workdir.join(&meta.filename)
    }

    /// Restore using the exact key only.
    ///
    /// Used by the producer to decide whether any work is needed.
    pub fn try_restore_exact(&self, meta: &SnapshotMeta) -> bool {
        let paths = [self.payload_path(meta)];
        match self.cache.restore(&paths, &meta.key, &[]) {
            Ok(matched) => matched.is_some(),
            Err(e) => {
                warn!("Failed to restore cache key {}: {}", meta.key, e);
                false
            }
        }
    }

    /// Restore using the exact key, then the label's restore key
    pub fn restore_with_fallback(&self, meta: &SnapshotMeta) -> RestoreOutcome {
        let paths = [self.payload_path(meta)];
        let restore_keys = [meta.restore_key.clone()];

        match self.cache.restore(&paths, &meta.key, &restore_keys) {
            Ok(Some(matched)) if meta.is_exact(&matched) => RestoreOutcome::Exact,
            Ok(Some(matched)) => RestoreOutcome::Fallback(matched),
            Ok(None) => RestoreOutcome::Missing,
            Err(e) => {
                warn!(
                    "Failed to restore cache from [{}, {}] keys: {}",
                    meta.key, meta.restore_key, e
                );
                RestoreOutcome::Missing
            }
        }
    }

    /// Read a previously restored payload
    pub fn load(&self, meta: &SnapshotMeta) -> Result<BuildSizes> {
        let path = self.payload_path(meta);
        let contents = self
            .fs
            .read_to_string(&path)
            .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
        BuildSizes::from_json(&contents)
            .with_context(|| format!("Failed to parse snapshot {}", path.display()))
    }

    /// Write `sizes` to the payload file and save it under the exact key.
    ///
    /// A reserve conflict means a concurrent run got there first; it is
    /// logged and reported as [`PersistOutcome::AlreadyCached`].
    pub fn persist(&self, meta: &SnapshotMeta, sizes: &BuildSizes) -> Result<PersistOutcome> {
        let path = self.payload_path(meta);
        if let Some(parent) = path.parent() {
            self.fs
                .create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        info!("Writing build size report to: {}", path.display());
        let contents = sizes.to_json().context("Failed to serialize build sizes")?;
        self.fs
            .write(&path, contents)
            .with_context(|| format!("Failed to write snapshot {}", path.display()))?;

        info!("Caching report to: {}", meta.key);
        match self.cache.save(&[path], &meta.key) {
            Ok(()) => Ok(PersistOutcome::Saved),
            Err(e) if e.is_reserve_conflict() => {
                warn!("{}", e);
                Ok(PersistOutcome::AlreadyCached)
            }
            Err(e) => Err(e).with_context(|| format!("Failed to cache snapshot under {}", meta.key)),
        }
    }
}
