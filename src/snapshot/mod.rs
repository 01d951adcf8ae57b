//! Build size snapshots
//!
//! A snapshot is the size map of one build directory for one
//! `(commit, label)` pair, stored in the artifact cache under keys derived by
//! [`SnapshotMeta`].

mod meta;
mod scanner;
mod sizes;
mod store;

pub use meta::{SnapshotMeta, DEFAULT_KEY_PREFIX, DEFAULT_SNAPSHOT_FILE};
pub use scanner::{scan, ScanError};
pub use sizes::BuildSizes;
pub use store::{PersistOutcome, RestoreOutcome, SnapshotStore};

pub(crate) use meta::is_key_safe;
