//! Artifact cache service interface
//!
//! Snapshots are persisted through a key/value artifact cache with
//! exact-then-prefix restore semantics. [`CacheService`] is the contract the
//! snapshot store consumes; [`LocalCacheStore`] is a directory-backed
//! implementation for environments without a hosted cache.

mod local;

pub use local::LocalCacheStore;

use std::path::PathBuf;
use thiserror::Error;

/// Cache service failures
#[derive(Debug, Error)]
pub enum CacheError {
    /// Another writer already reserved or saved this key
    #[error("Cache key already reserved: {key}")]
    ReserveConflict {
        /// Contended key
        key: String,
    },

    /// The request itself was malformed
    #[error("Invalid cache request: {0}")]
    InvalidRequest(String),

    /// Cache metadata could not be decoded
    #[error("Corrupt cache entry at {}: {source}", path.display())]
    Corrupt {
        /// Entry metadata file
        path: PathBuf,
        #[source]
        /// Decoding error
        source: serde_json::Error,
    },

    /// I/O failure while talking to the cache
    #[error("Cache I/O error: {context}")]
    Io {
        /// What the cache was doing
        context: String,
        #[source]
        /// IO error source
        source: std::io::Error,
    },
}

impl CacheError {
    /// True for a lost save race
    pub fn is_reserve_conflict(&self) -> bool {
        matches!(self, Self::ReserveConflict { .. })
    }

    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

/// Key/value artifact cache
///
/// Matching order on restore is part of the service contract: the exact
/// `key` first, then each of `restore_keys` in turn as a prefix, picking the
/// most recently saved entry sharing that prefix.
pub trait CacheService {
    /// Restore `paths` from the first matching entry.
    ///
    /// Returns the key that matched, or `None` on a miss.
    fn restore(
        &self,
        paths: &[PathBuf],
        key: &str,
        restore_keys: &[String],
    ) -> Result<Option<String>, CacheError>;

    /// Save `paths` under `key`.
    ///
    /// Fails with [`CacheError::ReserveConflict`] when the key already exists.
    fn save(&self, paths: &[PathBuf], key: &str) -> Result<(), CacheError>;
}

impl<C: CacheService + ?Sized> CacheService for &C {
    fn restore(
        &self,
        paths: &[PathBuf],
        key: &str,
        restore_keys: &[String],
    ) -> Result<Option<String>, CacheError> {
        (**self).restore(paths, key, restore_keys)
    }

    fn save(&self, paths: &[PathBuf], key: &str) -> Result<(), CacheError> {
        (**self).save(paths, key)
    }
}
