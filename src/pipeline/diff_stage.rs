//! Diff computation stage.
//!
//! Loads both snapshots before anything is reported, so a missing phase
//! fails the whole diff without partial output.

use crate::diff::{DiffEngine, SnapshotDiff};
use crate::model::SnapshotKey;
use crate::storage::SnapshotStore;
use anyhow::Result;

/// Compare snapshot `tag/old_phase` against `tag/new_phase`.
pub fn compute_diff(
    store: &SnapshotStore,
    tag: &str,
    old_phase: &str,
    new_phase: &str,
) -> Result<SnapshotDiff> {
    let old_key = SnapshotKey::new(tag, old_phase)?;
    let new_key = SnapshotKey::new(tag, new_phase)?;

    let old = store.read_snapshot(&old_key)?;
    let new = store.read_snapshot(&new_key)?;
    tracing::info!(
        "Comparing {old_key} ({} items) with {new_key} ({} items)",
        old.item_count(),
        new.item_count()
    );

    let result = DiffEngine::new().diff(&old, &new);
    tracing::info!(
        "{} of {} items changed",
        result.summary.total_changes(),
        result.summary.total_items
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SyscapError;
    use crate::model::{CapturedItem, ItemSource, ItemStatus};
    use crate::storage::Manifest;
    use chrono::Utc;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    fn store_snapshot(store: &SnapshotStore, phase: &str, motd: &str) {
        let key = SnapshotKey::new("t1", phase).unwrap();
        let items = vec![CapturedItem {
            name: "motd".to_string(),
            source: ItemSource::File(PathBuf::from("motd")),
            status: ItemStatus::Captured,
            content: motd.as_bytes().to_vec(),
        }];
        let manifest = Manifest::from_items(&key, Path::new("/"), &items, Utc::now());
        store.write_snapshot(&key, &items, &manifest).unwrap();
    }

    #[test]
    fn test_compute_diff_between_phases() {
        let tmp = TempDir::new().unwrap();
        let store = SnapshotStore::new(tmp.path());
        store_snapshot(&store, "pre", "hello");
        store_snapshot(&store, "post", "hello world");

        let result = compute_diff(&store, "t1", "pre", "post").unwrap();
        assert_eq!(result.summary.modified, 1);
        assert!(result.old_captured_at.is_some());
    }

    #[test]
    fn test_missing_new_phase_fails_before_output() {
        let tmp = TempDir::new().unwrap();
        let store = SnapshotStore::new(tmp.path());
        store_snapshot(&store, "pre", "hello");

        let err = compute_diff(&store, "t1", "pre", "post").unwrap_err();
        match err.downcast_ref::<SyscapError>() {
            Some(SyscapError::SnapshotNotFound {
                tag,
                phase,
                available,
            }) => {
                assert_eq!(tag, "t1");
                assert_eq!(phase, "post");
                assert_eq!(available, &vec!["pre".to_string()]);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_invalid_phase_is_config_error() {
        let tmp = TempDir::new().unwrap();
        let store = SnapshotStore::new(tmp.path());
        let err = compute_diff(&store, "t1", "../etc", "post").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SyscapError>(),
            Some(SyscapError::InvalidName { .. })
        ));
    }
}
