//! Size diff computation and report rendering
//!
//! Both halves are pure: [`diff`] turns two snapshots into ordered entries
//! and [`render`] turns entries into markdown.

mod comparator;
mod reporter;

pub use comparator::{diff, total_delta, ChangeKind, DiffEntry, SizeDiff};
pub use reporter::{render, RESTORE_FAILED_BANNER};
