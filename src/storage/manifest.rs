//! Snapshot manifest.
//!
//! Capture metadata lives in `.manifest.json` next to the item files so that
//! item content stays free of timestamps.

use super::naming::encode_item_name;
use crate::model::{CapturedItem, ItemStatus, SnapshotKey};
use crate::utils::content_hash_hex;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name of the manifest inside a snapshot directory.
pub const MANIFEST_FILE_NAME: &str = ".manifest.json";

/// Metadata describing one capture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// syscap version that wrote the snapshot
    pub version: String,
    pub tag: String,
    pub phase: String,
    /// Base directory the capture read from
    pub base_dir: PathBuf,
    pub captured_at: DateTime<Utc>,
    /// Per-item entries in capture order
    pub items: IndexMap<String, ManifestEntry>,
}

/// Manifest record for one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Storage file name
    pub file: String,
    /// Where the content came from
    pub source: String,
    pub status: ItemStatus,
    /// xxh3 of the stored bytes
    pub content_hash: String,
    pub size: u64,
}

impl Manifest {
    /// Describe a set of captured items.
    #[must_use]
    pub fn from_items(
        key: &SnapshotKey,
        base_dir: &Path,
        items: &[CapturedItem],
        captured_at: DateTime<Utc>,
    ) -> Self {
        let items = items
            .iter()
            .map(|item| {
                let entry = ManifestEntry {
                    file: encode_item_name(&item.name),
                    source: item.source.describe(),
                    status: item.status,
                    content_hash: content_hash_hex(&item.content),
                    size: item.content.len() as u64,
                };
                (item.name.clone(), entry)
            })
            .collect();

        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            tag: key.tag().to_string(),
            phase: key.phase().to_string(),
            base_dir: base_dir.to_path_buf(),
            captured_at,
            items,
        }
    }

    /// Status recorded for an item, if the manifest lists it.
    #[must_use]
    pub fn status_of(&self, name: &str) -> Option<ItemStatus> {
        self.items.get(name).map(|entry| entry.status)
    }

    /// Count of items with the given status.
    #[must_use]
    pub fn count_with_status(&self, status: ItemStatus) -> usize {
        self.items.values().filter(|e| e.status == status).count()
    }
}
