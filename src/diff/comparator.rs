//! Per-file size comparison between two snapshots

use crate::snapshot::BuildSizes;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeSet;

/// How a file changed between two snapshots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    /// Present only in the current build
    Added,
    /// Present only in the previous build
    Removed,
    /// Present in both with a different size
    Changed,
    /// Present in both with the same size
    Unchanged,
}

/// Size comparison of a single file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiffEntry {
    /// Build-relative path
    pub path: String,
    /// Size in the previous snapshot
    pub previous_size: Option<u64>,
    /// Size in the current build
    pub current_size: Option<u64>,
    /// `current - previous`, absent sides counting as zero
    pub delta: i64,
    /// Relative change; `None` when there is no non-zero previous size
    pub percent: Option<f64>,
}

impl DiffEntry {
    /// Compare one path's sizes
    pub fn new(path: impl Into<String>, previous_size: Option<u64>, current_size: Option<u64>) -> Self {
        let delta = signed(current_size.unwrap_or(0)) - signed(previous_size.unwrap_or(0));
        let percent = previous_size
            .filter(|&previous| previous > 0)
            .map(|previous| delta as f64 / previous as f64 * 100.0);

        Self {
            path: path.into(),
            previous_size,
            current_size,
            delta,
            percent,
        }
    }

    /// Classify the entry
    pub fn kind(&self) -> ChangeKind {
        match (self.previous_size, self.current_size) {
            (None, _) => ChangeKind::Added,
            (Some(_), None) => ChangeKind::Removed,
            _ if self.delta != 0 => ChangeKind::Changed,
            _ => ChangeKind::Unchanged,
        }
    }
}

/// Diff of two snapshots with summary totals
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SizeDiff {
    /// Changed entries, largest absolute delta first
    pub entries: Vec<DiffEntry>,
    /// Sum of all deltas
    pub total_delta: i64,
    /// Total size of the previous snapshot
    pub previous_total: u64,
    /// Total size of the current build
    pub current_total: u64,
}

impl SizeDiff {
    /// Compare `current` against `previous`
    ///
    /// # Examples
    ///
    /// ```
    /// use build_size::diff::SizeDiff;
    /// use build_size::snapshot::BuildSizes;
    ///
    /// let current: BuildSizes = [("a.js", 100), ("b.js", 50)].into_iter().collect();
    /// let previous: BuildSizes = [("a.js", 80), ("c.js", 20)].into_iter().collect();
    ///
    /// let diff = SizeDiff::compute(&current, &previous);
    /// let order: Vec<&str> = diff.entries.iter().map(|e| e.path.as_str()).collect();
    /// assert_eq!(order, ["b.js", "a.js", "c.js"]);
    /// assert_eq!(diff.total_delta, 50);
    /// ```
    pub fn compute(current: &BuildSizes, previous: &BuildSizes) -> Self {
        Self {
            entries: diff(current, previous),
            total_delta: total_delta(current, previous),
            previous_total: previous.total(),
            current_total: current.total(),
        }
    }

    /// True when no file changed
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Compare two snapshots file by file.
///
/// Unchanged files are dropped. Entries are ordered by descending absolute
/// delta, ties by ascending path.
pub fn diff(current: &BuildSizes, previous: &BuildSizes) -> Vec<DiffEntry> {
    let paths: BTreeSet<&str> = current.paths().chain(previous.paths()).collect();

    let mut entries: Vec<DiffEntry> = paths
        .into_iter()
        .map(|path| DiffEntry::new(path, previous.get(path), current.get(path)))
        .filter(|entry| entry.kind() != ChangeKind::Unchanged)
        .collect();

    entries.sort_by(compare_entries);
    entries
}

/// Total size change, `sum(current) - sum(previous)`
pub fn total_delta(current: &BuildSizes, previous: &BuildSizes) -> i64 {
    signed(current.total()) - signed(previous.total())
}

fn compare_entries(a: &DiffEntry, b: &DiffEntry) -> Ordering {
    b.delta
        .unsigned_abs()
        .cmp(&a.delta.unsigned_abs())
        .then_with(|| a.path.cmp(&b.path))
}

fn signed(bytes: u64) -> i64 {
    i64::try_from(bytes).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::collection::btree_map;
    use proptest::prelude::*;

    fn sizes(pairs: &[(&str, u64)]) -> BuildSizes {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_mixed_changes_are_ordered_by_magnitude_then_path() {
        let current = sizes(&[("a.js", 100), ("b.js", 50)]);
        let previous = sizes(&[("a.js", 80), ("c.js", 20)]);

        let entries = diff(&current, &previous);

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0], DiffEntry::new("b.js", None, Some(50)));
        assert_eq!(entries[0].kind(), ChangeKind::Added);
        assert_eq!(entries[0].delta, 50);
        assert_eq!(entries[1].path, "a.js");
        assert_eq!(entries[1].kind(), ChangeKind::Changed);
        assert_eq!(entries[1].delta, 20);
        assert_eq!(entries[1].percent, Some(25.0));
        assert_eq!(entries[2].path, "c.js");
        assert_eq!(entries[2].kind(), ChangeKind::Removed);
        assert_eq!(entries[2].delta, -20);
        assert_eq!(total_delta(&current, &previous), 50);
    }

    #[test]
    fn test_unchanged_files_are_dropped() {
        let current = sizes(&[("same.js", 10), ("grew.js", 11)]);
        let previous = sizes(&[("same.js", 10), ("grew.js", 10)]);

        let entries = diff(&current, &previous);

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].path, "grew.js");
    }

    #[test]
    fn test_empty_previous_marks_everything_added() {
        let current = sizes(&[("a.js", 3), ("b.js", 7)]);

        let result = SizeDiff::compute(&current, &BuildSizes::new());

        assert!(result.entries.iter().all(|e| e.kind() == ChangeKind::Added));
        assert!(result.entries.iter().all(|e| e.percent.is_none()));
        assert_eq!(result.total_delta, 10);
        assert_eq!(result.previous_total, 0);
        assert_eq!(result.current_total, 10);
    }

    #[test]
    fn test_zero_previous_size_has_no_percent() {
        let entry = DiffEntry::new("empty.txt", Some(0), Some(12));

        assert_eq!(entry.kind(), ChangeKind::Changed);
        assert_eq!(entry.delta, 12);
        assert_eq!(entry.percent, None);
    }

    #[test]
    fn test_removed_file_to_zero_size_is_still_removed() {
        let entry = DiffEntry::new("gone.js", Some(0), None);
        assert_eq!(entry.kind(), ChangeKind::Removed);
        assert_eq!(entry.delta, 0);
    }

    #[test]
    fn test_shrinking_file_has_negative_percent() {
        let entry = DiffEntry::new("vendor.js", Some(400), Some(300));
        assert_eq!(entry.delta, -100);
        assert_eq!(entry.percent, Some(-25.0));
    }

    fn size_map() -> impl Strategy<Value = BuildSizes> {
        btree_map("[a-e]{1,3}\\.js", 0u64..1_000_000, 0..12)
            .prop_map(|map| map.into_iter().collect())
    }

    proptest! {
        /// Property: diffing a snapshot against itself yields nothing
        #[test]
        fn prop_diff_with_itself_is_empty(map in size_map()) {
            prop_assert!(diff(&map, &map).is_empty());
            prop_assert_eq!(total_delta(&map, &map), 0);
        }

        /// Property: entry deltas sum to the difference of totals
        #[test]
        fn prop_total_delta_is_conserved(current in size_map(), previous in size_map()) {
            let entries = diff(&current, &previous);
            let sum: i64 = entries.iter().map(|e| e.delta).sum();
            prop_assert_eq!(sum, current.total() as i64 - previous.total() as i64);
            prop_assert_eq!(sum, total_delta(&current, &previous));
        }

        /// Property: additions and removals carry the one-sided size
        #[test]
        fn prop_one_sided_entries(current in size_map(), previous in size_map()) {
            for entry in diff(&current, &previous) {
                if !previous.contains(&entry.path) {
                    prop_assert_eq!(entry.previous_size, None);
                    prop_assert_eq!(entry.delta, current.get(&entry.path).unwrap() as i64);
                }
                if !current.contains(&entry.path) {
                    prop_assert_eq!(entry.current_size, None);
                    prop_assert_eq!(entry.delta, -(previous.get(&entry.path).unwrap() as i64));
                }
            }
        }

        /// Property: ordering is by |delta| descending, then path ascending
        #[test]
        fn prop_entries_are_sorted(current in size_map(), previous in size_map()) {
            let entries = diff(&current, &previous);
            for pair in entries.windows(2) {
                let (a, b) = (&pair[0], &pair[1]);
                prop_assert!(a.delta.unsigned_abs() >= b.delta.unsigned_abs());
                if a.delta.unsigned_abs() == b.delta.unsigned_abs() {
                    prop_assert!(a.path < b.path);
                }
            }
        }
    }
}
