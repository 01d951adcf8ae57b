//! Per-file build size map and its on-disk payload format

use serde::{Deserialize, Serialize};
use std::collections::btree_map;
use std::collections::BTreeMap;

/// Mapping of build-relative file path to size in bytes.
///
/// Serialized as a flat JSON object (`{"path": bytes, ...}`) with keys in
/// sorted order. There is no version field; the payload is exactly the map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BuildSizes(BTreeMap<String, u64>);

impl BuildSizes {
    /// Create an empty size map
    pub fn new() -> Self {
        Self::default()
    }

    /// Size of a single file, if present
    pub fn get(&self, path: &str) -> Option<u64> {
        self.0.get(path).copied()
    }

    /// Whether the map contains `path`
    pub fn contains(&self, path: &str) -> bool {
        self.0.contains_key(path)
    }

    /// Number of files
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no files were recorded
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(path, size)` pairs in path order
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(path, size)| (path.as_str(), *size))
    }

    /// Iterate over paths in order
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Sum of all file sizes
    pub fn total(&self) -> u64 {
        self.0.values().sum()
    }

    /// Compact JSON payload, as persisted in the cache
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Pretty JSON, for logs
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Parse a persisted payload
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

impl FromIterator<(String, u64)> for BuildSizes {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> FromIterator<(&'a str, u64)> for BuildSizes {
    fn from_iter<I: IntoIterator<Item = (&'a str, u64)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(path, size)| (path.to_string(), size))
                .collect(),
        )
    }
}

impl IntoIterator for BuildSizes {
    type Item = (String, u64);
    type IntoIter = btree_map::IntoIter<String, u64>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
