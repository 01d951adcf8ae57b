//! Report command implementation
//!
//! Handles the `build-size report` command: restores the closest snapshot for
//! the label, measures the current build, and posts the size diff to a pull
//! request.

use anyhow::{Context, Result};
use console::style;
use log::{info, warn};
use serde::Serialize;
use std::path::Path;

use crate::cache::{CacheService, LocalCacheStore};
use crate::config::{BuildInputs, ConfigFile, ReportInputs};
use crate::diff::{render, SizeDiff};
use crate::fmt::{emoji, format_delta, CHART, CHECKMARK, WARNING};
use crate::infra::FileSystem;
use crate::sink::{GhCliSink, ReportSink, StdoutSink};
use crate::snapshot::{scan, BuildSizes, RestoreOutcome, SnapshotMeta, SnapshotStore};

/// Where and how a report is published
#[derive(Debug, Clone)]
pub struct ReportTarget<'a> {
    /// Pull request number or URL
    pub pr: &'a str,
    /// Token authorized to comment on `pr`
    pub token: &'a str,
    /// Comment heading
    pub title: &'a str,
}

/// Result of one reporter run
#[derive(Debug, Clone, Serialize)]
pub struct ReportSummary {
    /// Per-file changes and totals
    #[serde(flatten)]
    pub diff: SizeDiff,
    /// True when no earlier snapshot could be restored
    pub restore_failed: bool,
    /// Markdown that was posted
    #[serde(skip)]
    pub body: String,
}

/// Reporter pipeline: restore with fallback, scan, diff, render, post.
///
/// A restore miss is not fatal; the report is rendered against an empty
/// baseline with a warning banner. Scan, load and post failures are fatal.
pub fn report<C, FS, S>(
    store: &SnapshotStore<C, FS>,
    meta: &SnapshotMeta,
    dir: &Path,
    sink: &S,
    target: &ReportTarget<'_>,
) -> Result<ReportSummary>
where
    C: CacheService,
    FS: FileSystem,
    S: ReportSink + ?Sized,
{
    let restored = store.restore_with_fallback(meta);

    info!("Computing build size for: {}", dir.display());
    let current = scan(dir).context("Failed to compute build size")?;

    let previous = match &restored {
        RestoreOutcome::Missing => {
            warn!(
                "Failed to restore cache from [{}, {}] keys",
                meta.key, meta.restore_key
            );
            BuildSizes::new()
        }
        RestoreOutcome::Fallback(matched) => {
            warn!(
                "Failed to find latest key for sha \"{}\", using \"{}\" instead",
                meta.commit, matched
            );
            store.load(meta)?
        }
        RestoreOutcome::Exact => store.load(meta)?,
    };

    let restore_failed = restored.is_missing();
    let diff = SizeDiff::compute(&current, &previous);
    let body = render(&diff.entries, diff.total_delta, restore_failed);

    info!("Posting build size report to {}", target.pr);
    sink.post(target.pr, target.token, target.title, &body)
        .with_context(|| format!("Failed to post build size report to {}", target.pr))?;

    Ok(ReportSummary {
        diff,
        restore_failed,
        body,
    })
}

/// Presentation options of the report command
#[derive(Debug, Clone, Default)]
pub struct ReportOptions {
    /// Print the comment instead of posting it
    pub dry_run: bool,
    /// Print the structured diff as JSON
    pub json: bool,
    /// Repository passed to `gh --repo`
    pub repo: Option<String>,
}

/// Main report command handler (presentation layer)
///
/// # Examples
///
/// ```no_run
/// use build_size::cmd::report::{cmd_report, ReportOptions};
/// use build_size::config::{BuildInputs, ConfigFile, ReportInputs};
/// use std::path::{Path, PathBuf};
///
/// let inputs = BuildInputs {
///     dir: PathBuf::from("dist"),
///     sha: "9fceb02".to_string(),
///     label: "web".to_string(),
/// };
/// let pr = ReportInputs {
///     pr: "42".to_string(),
///     token: std::env::var("GITHUB_TOKEN")?,
/// };
/// let options = ReportOptions {
///     dry_run: true,
///     ..ReportOptions::default()
/// };
/// cmd_report(&inputs, &pr, &ConfigFile::default(), Path::new("."), &options)?;
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn cmd_report(
    inputs: &BuildInputs,
    report_inputs: &ReportInputs,
    config: &ConfigFile,
    workdir: &Path,
    options: &ReportOptions,
) -> Result<()> {
    inputs.validate()?;
    report_inputs.validate()?;

    let meta = SnapshotMeta::derive_with(
        &config.key_prefix,
        &config.snapshot_file,
        &inputs.sha,
        &inputs.label,
    );
    let cache = LocalCacheStore::new(workdir.join(&config.cache_dir));
    let store = SnapshotStore::new(cache, workdir);
    let title = format!("{}: {}", config.report_title, inputs.label);
    let target = ReportTarget {
        pr: &report_inputs.pr,
        token: &report_inputs.token,
        title: &title,
    };

    // Human-readable output goes to stderr when stdout carries JSON or the comment
    eprintln!("{}{} Report", emoji(&CHART), style("build-size").bold());

    let dir = workdir.join(&inputs.dir);
    let summary = if options.dry_run {
        report(&store, &meta, &dir, &StdoutSink, &target)?
    } else {
        let mut sink = GhCliSink::new();
        if let Some(repo) = &options.repo {
            sink = sink.with_repo(repo.as_str());
        }
        report(&store, &meta, &dir, &sink, &target)?
    };

    if summary.restore_failed {
        eprintln!(
            "{}{}",
            emoji(&WARNING),
            style("No previous snapshot found, compared against an empty baseline").yellow()
        );
    }
    if summary.diff.is_empty() {
        eprintln!("{}No file size changes", emoji(&CHECKMARK));
    } else {
        eprintln!(
            "{}{} changed file(s), total change {}",
            emoji(&CHECKMARK),
            summary.diff.entries.len(),
            style(format_delta(summary.diff.total_delta)).bold()
        );
    }

    if options.json {
        let json =
            serde_json::to_string_pretty(&summary).context("Failed to serialize JSON report")?;
        println!("{}", json);
    }

    Ok(())
}
