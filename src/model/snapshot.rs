//! Snapshot identity and contents.

use super::item::CapturedItem;
use crate::error::{Result, SyscapError};
use crate::storage::Manifest;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

static SEGMENT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_][A-Za-z0-9._-]*$").expect("static regex"));

/// Longest tag or phase label accepted.
pub const MAX_SEGMENT_LEN: usize = 128;

/// Check that `value` can be used verbatim as one storage path segment.
///
/// Accepted: ASCII letters, digits, `_`, `-` and `.`, not starting with `.`
/// or `-`. That rules out `.`, `..`, separators and hidden names, which
/// the store reserves for staging directories and manifests.
pub fn validate_segment(kind: &'static str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(SyscapError::invalid_name(kind, value, "must not be empty"));
    }
    if value.len() > MAX_SEGMENT_LEN {
        return Err(SyscapError::invalid_name(
            kind,
            value,
            format!("longer than {MAX_SEGMENT_LEN} characters"),
        ));
    }
    if !SEGMENT_PATTERN.is_match(value) {
        return Err(SyscapError::invalid_name(
            kind,
            value,
            "only letters, digits, '_', '-' and '.' are allowed, and it must not start with '.' or '-'",
        ));
    }
    Ok(())
}

/// Identity of a snapshot: `(tag, phase)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SnapshotKey {
    tag: String,
    phase: String,
}

impl SnapshotKey {
    /// Build a key, rejecting tags and phases that are unsafe path segments.
    pub fn new(tag: impl Into<String>, phase: impl Into<String>) -> Result<Self> {
        let tag = tag.into();
        let phase = phase.into();
        validate_segment("tag", &tag)?;
        validate_segment("phase", &phase)?;
        Ok(Self { tag, phase })
    }

    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    #[must_use]
    pub fn phase(&self) -> &str {
        &self.phase
    }
}

impl fmt::Display for SnapshotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.tag, self.phase)
    }
}

/// A snapshot read back from storage.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Which snapshot this is
    pub key: SnapshotKey,
    /// Item contents keyed by item name, in lexicographic order
    pub items: BTreeMap<String, Vec<u8>>,
    /// Capture metadata, when the snapshot has a manifest
    pub manifest: Option<Manifest>,
}

impl Snapshot {
    /// Create an empty snapshot.
    #[must_use]
    pub const fn new(key: SnapshotKey) -> Self {
        Self {
            key,
            items: BTreeMap::new(),
            manifest: None,
        }
    }

    /// Build an in-memory snapshot from captured items.
    #[must_use]
    pub fn from_items(key: SnapshotKey, items: &[CapturedItem]) -> Self {
        let mut snapshot = Self::new(key);
        for item in items {
            snapshot
                .items
                .insert(item.name.clone(), item.content.clone());
        }
        snapshot
    }

    /// Item content by name.
    #[must_use]
    pub fn item(&self, name: &str) -> Option<&[u8]> {
        self.items.get(name).map(Vec::as_slice)
    }

    #[must_use]
    pub fn item_count(&self) -> usize {
        self.items.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_segments() {
        for value in ["pre", "post", "t1", "pre-upgrade", "2024.10.01", "_x", "A_b.c-9"] {
            assert!(validate_segment("phase", value).is_ok(), "{value}");
        }
    }

    #[test]
    fn test_invalid_segments() {
        for value in [
            "", ".", "..", "../etc", "a/b", ".hidden", "-flag", "with space", "tab\t", "naïve",
            "a\\b",
        ] {
            assert!(validate_segment("tag", value).is_err(), "{value:?}");
        }
    }

    #[test]
    fn test_overlong_segment() {
        let long = "a".repeat(MAX_SEGMENT_LEN + 1);
        let err = validate_segment("tag", &long).unwrap_err();
        assert!(err.to_string().contains("longer than"));
        assert!(validate_segment("tag", &long[1..]).is_ok());
    }

    #[test]
    fn test_key_reports_which_part_is_invalid() {
        let err = SnapshotKey::new("t1", "../post").unwrap_err();
        match err {
            SyscapError::InvalidName { kind, value, .. } => {
                assert_eq!(kind, "phase");
                assert_eq!(value, "../post");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_key_display() {
        let key = SnapshotKey::new("t1", "pre").unwrap();
        assert_eq!(key.to_string(), "t1/pre");
        assert_eq!(key.tag(), "t1");
        assert_eq!(key.phase(), "pre");
    }
}
