//! Snapshot command implementation
//!
//! Handles the `build-size snapshot` command, which records the size of every
//! file in a build directory under the `(commit, label)` cache key so later
//! runs can compare against it.

use anyhow::{Context, Result};
use console::style;
use log::{debug, info};
use std::path::Path;

use crate::cache::{CacheService, LocalCacheStore};
use crate::config::{BuildInputs, ConfigFile};
use crate::fmt::{emoji, format_bytes, CHECKMARK, INFO, PACKAGE};
use crate::infra::FileSystem;
use crate::snapshot::{scan, BuildSizes, PersistOutcome, SnapshotMeta, SnapshotStore};

/// What the producer pipeline did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProduceOutcome {
    /// A snapshot for this commit and label already existed
    CacheHit,
    /// The build was measured and saved
    Saved(BuildSizes),
    /// The build was measured but a concurrent run saved the key first
    AlreadyCached(BuildSizes),
}

/// Producer pipeline: skip on an exact cache hit, otherwise scan and persist.
///
/// Scan failures and non-conflict save failures are fatal. A save conflict
/// means another run stored the same snapshot and is not an error.
pub fn produce<C, FS>(
    store: &SnapshotStore<C, FS>,
    meta: &SnapshotMeta,
    dir: &Path,
) -> Result<ProduceOutcome>
where
    C: CacheService,
    FS: FileSystem,
{
    info!("Checking cache for the: {}", meta.key);
    if store.try_restore_exact(meta) {
        info!("Cache hit, finishing the job...");
        return Ok(ProduceOutcome::CacheHit);
    }

    info!("Computing build size for: {}", dir.display());
    let sizes = scan(dir).context("Failed to compute build size")?;
    debug!(
        "Build sizes:\n{}",
        sizes.to_json_pretty().unwrap_or_default()
    );

    match store.persist(meta, &sizes)? {
        PersistOutcome::Saved => Ok(ProduceOutcome::Saved(sizes)),
        PersistOutcome::AlreadyCached => Ok(ProduceOutcome::AlreadyCached(sizes)),
    }
}

/// Main snapshot command handler (presentation layer)
///
/// # Examples
///
/// ```no_run
/// use build_size::cmd::snapshot::cmd_snapshot;
/// use build_size::config::{BuildInputs, ConfigFile};
/// use std::path::{Path, PathBuf};
///
/// let inputs = BuildInputs {
///     dir: PathBuf::from("dist"),
///     sha: "9fceb02".to_string(),
///     label: "web".to_string(),
/// };
/// cmd_snapshot(&inputs, &ConfigFile::default(), Path::new("."))?;
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn cmd_snapshot(inputs: &BuildInputs, config: &ConfigFile, workdir: &Path) -> Result<()> {
    inputs.validate()?;

    let meta = SnapshotMeta::derive_with(
        &config.key_prefix,
        &config.snapshot_file,
        &inputs.sha,
        &inputs.label,
    );
    let cache = LocalCacheStore::new(workdir.join(&config.cache_dir));
    debug!("Using snapshot cache at {}", cache.root().display());
    let store = SnapshotStore::new(cache, workdir);

    println!("{}{} Snapshot", emoji(&PACKAGE), style("build-size").bold());
    println!();

    let dir = workdir.join(&inputs.dir);
    match produce(&store, &meta, &dir)? {
        ProduceOutcome::CacheHit => {
            println!(
                "{}Snapshot {} already cached, nothing to do",
                emoji(&INFO),
                style(&meta.key).cyan()
            );
        }
        ProduceOutcome::Saved(sizes) => {
            println!(
                "{}Saved {} ({} files, {})",
                emoji(&CHECKMARK),
                style(&meta.key).cyan(),
                sizes.len(),
                style(format_bytes(sizes.total())).green()
            );
        }
        ProduceOutcome::AlreadyCached(sizes) => {
            println!(
                "{}Snapshot {} was saved by another run ({} files, {})",
                emoji(&INFO),
                style(&meta.key).cyan(),
                sizes.len(),
                format_bytes(sizes.total())
            );
        }
    }

    Ok(())
}
