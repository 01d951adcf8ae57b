//! Cache key derivation for build snapshots

use std::fmt::Write as _;

/// Default prefix shared by every snapshot key
pub const DEFAULT_KEY_PREFIX: &str = "build-size";

/// Default local path of the snapshot payload
pub const DEFAULT_SNAPSHOT_FILE: &str = "build-size.json";

/// Cache addressing for one `(commit, label)` snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotMeta {
    /// Key for exactly this commit and label
    pub key: String,
    /// Label-only key; prefix of every exact key of the same label
    pub restore_key: String,
    /// Relative path the payload is written to and restored into
    pub filename: String,
    /// Commit the snapshot belongs to
    pub commit: String,
}

impl SnapshotMeta {
    /// Derive snapshot keys with the default prefix and payload path
    ///
    /// # Examples
    ///
    /// ```
    /// use build_size::snapshot::SnapshotMeta;
    ///
    /// let meta = SnapshotMeta::derive("9fceb02", "web");
    /// assert_eq!(meta.key, "build-size-web-9fceb02");
    /// assert!(meta.key.starts_with(&meta.restore_key));
    /// ```
    pub fn derive(commit: &str, label: &str) -> Self {
        Self::derive_with(DEFAULT_KEY_PREFIX, DEFAULT_SNAPSHOT_FILE, commit, label)
    }

    /// Derive snapshot keys with an explicit prefix and payload path
    ///
    /// Empty `commit` or `label` must be rejected by configuration
    /// validation before reaching this point.
    pub fn derive_with(prefix: &str, filename: &str, commit: &str, label: &str) -> Self {
        debug_assert!(!commit.is_empty(), "commit must be validated non-empty");
        debug_assert!(!label.is_empty(), "label must be validated non-empty");

        let restore_key = format!("{}-{}-", prefix, escape_key_segment(label));
        let key = format!("{}{}", restore_key, commit);

        Self {
            key,
            restore_key,
            filename: filename.to_string(),
            commit: commit.to_string(),
        }
    }

    /// True when `matched` is this snapshot's own exact key
    pub fn is_exact(&self, matched: &str) -> bool {
        self.key == matched
    }
}

/// Whether a byte is kept verbatim inside a key segment
pub(crate) fn is_key_safe(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'.' | b'_' | b'+' | b'/' | b':' | b'@')
}

/// Percent-encode everything outside the key-safe set.
///
/// `-` is always encoded, so an escaped label can never run into the commit
/// separator and one label's restore key is never a prefix of another's.
pub(crate) fn escape_key_segment(segment: &str) -> String {
    let mut escaped = String::with_capacity(segment.len());
    for &byte in segment.as_bytes() {
        if is_key_safe(byte) {
            escaped.push(byte as char);
        } else {
            let _ = write!(escaped, "%{:02X}", byte);
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_derive_builds_key_from_label_and_commit() {
        let meta = SnapshotMeta::derive("abc123", "production");

        assert_eq!(meta.key, "build-size-production-abc123");
        assert_eq!(meta.restore_key, "build-size-production-");
        assert_eq!(meta.filename, "build-size.json");
        assert_eq!(meta.commit, "abc123");
    }

    #[test]
    fn test_derive_with_custom_prefix_and_file() {
        let meta = SnapshotMeta::derive_with("bundle", "out/sizes.json", "abc123", "web");

        assert_eq!(meta.key, "bundle-web-abc123");
        assert_eq!(meta.restore_key, "bundle-web-");
        assert_eq!(meta.filename, "out/sizes.json");
    }

    #[test]
    fn test_label_dashes_are_escaped() {
        let meta = SnapshotMeta::derive("c", "a-b");
        assert_eq!(meta.key, "build-size-a%2Db-c");

        let other = SnapshotMeta::derive("b-c", "a");
        assert_ne!(meta.key, other.key);
    }

    #[test]
    fn test_restore_key_does_not_cover_longer_labels() {
        let web = SnapshotMeta::derive("abc", "web");
        let web_legacy = SnapshotMeta::derive("abc", "web-legacy");

        assert!(!web_legacy.key.starts_with(&web.restore_key));
    }

    #[test]
    fn test_escape_handles_spaces_commas_and_unicode() {
        assert_eq!(escape_key_segment("ios, release"), "ios%2C%20release");
        assert_eq!(escape_key_segment("é"), "%C3%A9");
        assert_eq!(escape_key_segment("50%"), "50%25");
    }

    #[test]
    fn test_is_exact_distinguishes_fallback_matches() {
        let meta = SnapshotMeta::derive("abc", "web");
        assert!(meta.is_exact("build-size-web-abc"));
        assert!(!meta.is_exact("build-size-web-def"));
    }

    proptest! {
        /// Property: derivation is a pure function of its inputs
        #[test]
        fn prop_derive_is_deterministic(commit in "[0-9a-f]{7,40}", label in "\\PC{1,24}") {
            prop_assert_eq!(SnapshotMeta::derive(&commit, &label), SnapshotMeta::derive(&commit, &label));
        }

        /// Property: distinct commits never share an exact key
        #[test]
        fn prop_distinct_commits_distinct_keys(
            c1 in "[0-9a-f]{7,40}",
            c2 in "[0-9a-f]{7,40}",
            label in "\\PC{1,24}"
        ) {
            prop_assume!(c1 != c2);
            prop_assert_ne!(SnapshotMeta::derive(&c1, &label).key, SnapshotMeta::derive(&c2, &label).key);
        }

        /// Property: the restore key is a prefix of its own exact key only
        #[test]
        fn prop_restore_key_scoped_to_label(
            commit in "[0-9a-f]{7,40}",
            l1 in "[a-z-]{1,12}",
            l2 in "[a-z-]{1,12}"
        ) {
            let m1 = SnapshotMeta::derive(&commit, &l1);
            let m2 = SnapshotMeta::derive(&commit, &l2);
            prop_assert!(m1.key.starts_with(&m1.restore_key));
            prop_assert_eq!(m2.key.starts_with(&m1.restore_key), l1 == l2);
        }
    }
}
