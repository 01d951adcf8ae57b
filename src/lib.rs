#![warn(missing_docs)]
#![warn(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! build-size library
//!
//! Tracks the size of every file in a build output directory across commits.
//! A producer run records a snapshot of the current build under a
//! `(commit, label)` cache key; a reporter run restores the closest earlier
//! snapshot for the same label, compares it with the current build and posts
//! a Markdown table of the changes to a pull request.
//!
//! # Basic Example
//!
//! Deriving cache keys and diffing two snapshots:
//!
//! ```
//! use build_size::diff::{render, SizeDiff};
//! use build_size::snapshot::{BuildSizes, SnapshotMeta};
//!
//! let meta = SnapshotMeta::derive("9fceb02", "web");
//! assert_eq!(meta.restore_key, "build-size-web-");
//!
//! let previous: BuildSizes = [("app.js", 1000), ("old.css", 200)].into_iter().collect();
//! let current: BuildSizes = [("app.js", 1500), ("new.css", 300)].into_iter().collect();
//!
//! let diff = SizeDiff::compute(&current, &previous);
//! assert_eq!(diff.total_delta, 600);
//!
//! let markdown = render(&diff.entries, diff.total_delta, false);
//! assert!(markdown.contains("`app.js`"));
//! ```
//!
//! # Advanced Example: Local Snapshot Cache
//!
//! Persisting a snapshot and restoring it for a later commit:
//!
//! ```
//! use build_size::cache::LocalCacheStore;
//! use build_size::snapshot::{BuildSizes, RestoreOutcome, SnapshotMeta, SnapshotStore};
//! use tempfile::TempDir;
//!
//! let workspace = TempDir::new().unwrap();
//! let cache = LocalCacheStore::new(workspace.path().join("cache"));
//! let store = SnapshotStore::new(&cache, workspace.path());
//!
//! let base = SnapshotMeta::derive("abc123", "web");
//! let sizes: BuildSizes = [("app.js", 1000)].into_iter().collect();
//! store.persist(&base, &sizes).unwrap();
//!
//! let head = SnapshotMeta::derive("def456", "web");
//! let outcome = store.restore_with_fallback(&head);
//! assert_eq!(outcome, RestoreOutcome::Fallback(base.key.clone()));
//! assert_eq!(store.load(&head).unwrap(), sizes);
//! ```

/// Artifact cache services
pub mod cache;
/// Command handlers for CLI operations
pub mod cmd;
/// Configuration file and input validation
pub mod config;
/// Snapshot comparison and Markdown rendering
pub mod diff;
/// Enhanced error types with contextual suggestions
pub mod error;
/// Shared formatting utilities
pub mod fmt;
/// Infrastructure traits for filesystem and command execution
pub mod infra;
/// Report publishing
pub mod sink;
/// Build snapshots: keys, scanning and persistence
pub mod snapshot;
