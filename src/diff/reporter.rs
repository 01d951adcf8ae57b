//! Markdown rendering of a size diff

use super::comparator::{ChangeKind, DiffEntry};
use crate::fmt::{format_bytes, format_delta, format_percent};

/// Banner placed above the report when no previous snapshot was restored
pub const RESTORE_FAILED_BANNER: &str = "> :warning: Failed to restore a previous build size snapshot. \
Sizes below are compared against an empty baseline.";

const TABLE_HEADER: &str = "| File | Previous | Current | Delta | Change |\n\
| :--- | ---: | ---: | ---: | ---: |";

/// Render the report body.
///
/// Output depends only on the arguments, so identical inputs always produce
/// identical text.
///
/// # Examples
///
/// ```
/// use build_size::diff::{render, DiffEntry};
///
/// let entries = vec![DiffEntry::new("main.js", Some(1024), Some(2048))];
/// let report = render(&entries, 1024, false);
/// assert!(report.contains("| `main.js` | 1.00 KB | 2.00 KB | +1.00 KB | +100.00% |"));
/// assert!(report.ends_with("**Total change:** +1.00 KB\n"));
/// ```
pub fn render(entries: &[DiffEntry], total_delta: i64, restore_failed: bool) -> String {
    let mut lines = Vec::with_capacity(entries.len() + 6);

    if restore_failed {
        lines.push(RESTORE_FAILED_BANNER.to_string());
        lines.push(String::new());
    }

    if entries.is_empty() {
        lines.push("No file size changes.".to_string());
    } else {
        lines.push(TABLE_HEADER.to_string());
        lines.extend(entries.iter().map(render_row));
    }

    lines.push(String::new());
    lines.push(format!("**Total change:** {}", format_delta(total_delta)));

    let mut report = lines.join("\n");
    report.push('\n');
    report
}

fn render_row(entry: &DiffEntry) -> String {
    format!(
        "| {} | {} | {} | {} | {} |",
        render_path(&entry.path),
        render_size(entry.previous_size),
        render_size(entry.current_size),
        format_delta(entry.delta),
        render_change(entry)
    )
}

fn render_size(size: Option<u64>) -> String {
    size.map(format_bytes).unwrap_or_else(|| "-".to_string())
}

fn render_change(entry: &DiffEntry) -> String {
    match (entry.kind(), entry.percent) {
        (ChangeKind::Removed, _) => "removed".to_string(),
        (_, Some(percent)) => format_percent(percent),
        (_, None) => "new".to_string(),
    }
}

/// Code-format a path, keeping table cells and rows intact
fn render_path(path: &str) -> String {
    let escaped = path
        .replace('|', "\\|")
        .replace('\r', "\\r")
        .replace('\n', "\\n");
    if escaped.contains('`') {
        escaped
    } else {
        format!("`{}`", escaped)
    }
}
