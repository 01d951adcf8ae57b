//! Directory-backed artifact cache
//!
//! Layout under the store root:
//!
//! ```text
//! entries/<escaped key>/0, 1, ...   payload files, in request order
//! entries/<escaped key>/entry.json  commit marker, written last
//! ```
//!
//! The marker is staged next to its final name and renamed into place, and
//! an unreadable marker only hides its own entry.
//!
//! An entry directory is reserved with an atomic `create_dir`, so two
//! writers racing on the same key see exactly one winner. Entries without a
//! commit marker are ignored on restore.

use super::{CacheError, CacheService};
use crate::infra::{FileSystem, RealFileSystem};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

const ENTRIES_DIR: &str = "entries";
const ENTRY_FILE: &str = "entry.json";
const STAGED_ENTRY_FILE: &str = "entry.json.tmp";

/// Commit marker of a saved entry
#[derive(Debug, Clone, Serialize, Deserialize)]
struct EntryRecord {
    key: String,
    /// Nanoseconds since the Unix epoch, strictly increasing within a store
    saved_at: u64,
    files: usize,
}

/// Cache store kept in a local directory
pub struct LocalCacheStore<FS: FileSystem = RealFileSystem> {
    root: PathBuf,
    fs: FS,
}

impl LocalCacheStore<RealFileSystem> {
    /// Open (or lazily create) a store rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_fs(root, RealFileSystem)
    }
}

impl<FS: FileSystem> LocalCacheStore<FS> {
    /// Open a store with a custom filesystem implementation
    pub fn with_fs(root: impl Into<PathBuf>, fs: FS) -> Self {
        Self {
            root: root.into(),
            fs,
        }
    }

    /// Store root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn entries_dir(&self) -> PathBuf {
        self.root.join(ENTRIES_DIR)
    }

    fn entry_dir(&self, key: &str) -> PathBuf {
        self.entries_dir().join(escape_file_name(key))
    }

    /// All committed entries
    fn committed_entries(&self) -> Result<Vec<EntryRecord>, CacheError> {
        let entries_dir = self.entries_dir();
        let read_dir = match self.fs.read_dir(&entries_dir) {
            Ok(read_dir) => read_dir,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(CacheError::io("Failed to list cache entries", e)),
        };

        let mut records = Vec::new();
        for dir_entry in read_dir {
            let dir_entry =
                dir_entry.map_err(|e| CacheError::io("Failed to list cache entries", e))?;
            let marker = dir_entry.path().join(ENTRY_FILE);

            let contents = match self.fs.read_to_string(&marker) {
                Ok(contents) => contents,
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    debug!("Skipping uncommitted cache entry {}", dir_entry.path().display());
                    continue;
                }
                Err(e) => {
                    return Err(CacheError::io(
                        format!("Failed to read {}", marker.display()),
                        e,
                    ))
                }
            };

            match serde_json::from_str::<EntryRecord>(&contents) {
                Ok(record) => records.push(record),
                Err(e) => warn!("Skipping corrupt cache entry {}: {}", marker.display(), e),
            }
        }

        Ok(records)
    }

    /// Pick the entry matching `key` exactly, else the newest entry for the
    /// first restore key that has any.
    fn resolve<'a>(
        records: &'a [EntryRecord],
        key: &str,
        restore_keys: &[String],
    ) -> Option<&'a EntryRecord> {
        if let Some(exact) = records.iter().find(|r| r.key == key) {
            return Some(exact);
        }

        restore_keys.iter().find_map(|prefix| {
            records
                .iter()
                .filter(|r| r.key.starts_with(prefix.as_str()))
                .max_by(|a, b| (a.saved_at, &a.key).cmp(&(b.saved_at, &b.key)))
        })
    }

    fn next_timestamp(records: &[EntryRecord]) -> Result<u64, CacheError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| CacheError::io("System clock is before Unix epoch", io::Error::other(e)))?
            .as_nanos();
        let now = u64::try_from(now).unwrap_or(u64::MAX);

        let newest = records.iter().map(|r| r.saved_at).max().unwrap_or(0);
        Ok(now.max(newest.saturating_add(1)))
    }
}

impl<FS: FileSystem> CacheService for LocalCacheStore<FS> {
    fn restore(
        &self,
        paths: &[PathBuf],
        key: &str,
        restore_keys: &[String],
    ) -> Result<Option<String>, CacheError> {
        let records = self.committed_entries()?;
        let Some(record) = Self::resolve(&records, key, restore_keys) else {
            debug!("No cache entry for {} (restore keys: {:?})", key, restore_keys);
            return Ok(None);
        };

        if record.files != paths.len() {
            return Err(CacheError::InvalidRequest(format!(
                "entry {} holds {} file(s) but {} path(s) were requested",
                record.key,
                record.files,
                paths.len()
            )));
        }

        let entry_dir = self.entry_dir(&record.key);
        for (index, path) in paths.iter().enumerate() {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                self.fs
                    .create_dir_all(parent)
                    .map_err(|e| CacheError::io(format!("Failed to create {}", parent.display()), e))?;
            }
            self.fs
                .copy(&entry_dir.join(index.to_string()), path)
                .map_err(|e| CacheError::io(format!("Failed to restore {}", path.display()), e))?;
        }

        debug!("Restored {} file(s) from cache entry {}", paths.len(), record.key);
        Ok(Some(record.key.clone()))
    }

    fn save(&self, paths: &[PathBuf], key: &str) -> Result<(), CacheError> {
        if paths.is_empty() {
            return Err(CacheError::InvalidRequest(
                "at least one path is required".to_string(),
            ));
        }

        let records = self.committed_entries()?;
        let saved_at = Self::next_timestamp(&records)?;

        let entries_dir = self.entries_dir();
        self.fs
            .create_dir_all(&entries_dir)
            .map_err(|e| CacheError::io("Failed to create cache directory", e))?;

        let entry_dir = self.entry_dir(key);
        match self.fs.create_dir(&entry_dir) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                return Err(CacheError::ReserveConflict {
                    key: key.to_string(),
                });
            }
            Err(e) => return Err(CacheError::io(format!("Failed to reserve {}", key), e)),
        }

        for (index, path) in paths.iter().enumerate() {
            self.fs
                .copy(path, &entry_dir.join(index.to_string()))
                .map_err(|e| CacheError::io(format!("Failed to cache {}", path.display()), e))?;
        }

        let record = EntryRecord {
            key: key.to_string(),
            saved_at,
            files: paths.len(),
        };
        let marker = entry_dir.join(ENTRY_FILE);
        let contents = serde_json::to_string_pretty(&record).map_err(|source| {
            CacheError::Corrupt {
                path: marker.clone(),
                source,
            }
        })?;
        let staged = entry_dir.join(STAGED_ENTRY_FILE);
        let committed = self
            .fs
            .write(&staged, contents)
            .and_then(|()| self.fs.rename(&staged, &marker));
        if let Err(e) = committed {
            warn!(
                "Cache entry {} left uncommitted at {}",
                key,
                entry_dir.display()
            );
            return Err(CacheError::io(format!("Failed to commit {}", key), e));
        }

        debug!("Saved {} file(s) under cache key {}", paths.len(), key);
        Ok(())
    }
}

/// Map a cache key to a portable directory name
fn escape_file_name(key: &str) -> String {
    let mut name = String::with_capacity(key.len());
    for &byte in key.as_bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'.' | b'_') {
            name.push(byte as char);
        } else {
            let _ = write!(name, "%{:02X}", byte);
        }
    }
    name
}
