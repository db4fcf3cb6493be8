//! On-disk snapshot storage.
//!
//! Layout under the storage root:
//!
//! ```text
//! <root>/<tag>/<phase>/<encoded item name>
//! <root>/<tag>/<phase>/.manifest.json
//! ```
//!
//! A snapshot is written into `<root>/<tag>/.<phase>.partial` first and then
//! renamed into place, so a snapshot directory always holds the output of
//! exactly one capture.

mod manifest;
mod naming;

pub use manifest::{Manifest, ManifestEntry, MANIFEST_FILE_NAME};
pub use naming::{
    decode_item_name, encode_item_name, encoded_len, fits_file_name, MAX_FILE_NAME_LEN,
};

use crate::error::{ErrorContext, Result, SyscapError};
use crate::model::{CapturedItem, Snapshot, SnapshotKey};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Snapshot store rooted at one directory.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    root: PathBuf,
}

impl SnapshotStore {
    /// Create a store; nothing is touched on disk until a snapshot is written.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding every phase of a tag.
    #[must_use]
    pub fn tag_dir(&self, tag: &str) -> PathBuf {
        self.root.join(tag)
    }

    /// Directory holding one snapshot.
    #[must_use]
    pub fn snapshot_dir(&self, key: &SnapshotKey) -> PathBuf {
        self.tag_dir(key.tag()).join(key.phase())
    }

    fn staging_dir(&self, key: &SnapshotKey) -> PathBuf {
        self.tag_dir(key.tag())
            .join(format!(".{}.partial", key.phase()))
    }

    /// Path of a single item file.
    #[must_use]
    pub fn item_path(&self, key: &SnapshotKey, item_name: &str) -> PathBuf {
        self.snapshot_dir(key).join(encode_item_name(item_name))
    }

    /// Whether a snapshot exists.
    #[must_use]
    pub fn exists(&self, key: &SnapshotKey) -> bool {
        self.snapshot_dir(key).is_dir()
    }

    /// Phases captured under a tag, sorted. Empty when the tag is unknown.
    pub fn list_phases(&self, tag: &str) -> Result<Vec<String>> {
        list_visible_dirs(&self.tag_dir(tag))
    }

    /// Write a complete snapshot, replacing any previous one for the key.
    ///
    /// Returns the snapshot directory.
    pub fn write_snapshot(
        &self,
        key: &SnapshotKey,
        items: &[CapturedItem],
        manifest: &Manifest,
    ) -> Result<PathBuf> {
        let mut seen = HashSet::new();
        for item in items {
            if item.name.is_empty() {
                return Err(SyscapError::config("item name must not be empty"));
            }
            if !fits_file_name(&item.name) {
                return Err(SyscapError::config(format!(
                    "item name '{}' is too long to store ({} bytes encoded, limit {MAX_FILE_NAME_LEN})",
                    item.name,
                    encoded_len(&item.name)
                )));
            }
            if !seen.insert(item.name.as_str()) {
                return Err(SyscapError::config(format!(
                    "duplicate item name '{}' in snapshot {key}",
                    item.name
                )));
            }
        }

        let tag_dir = self.tag_dir(key.tag());
        fs::create_dir_all(&tag_dir)
            .map_err(|e| SyscapError::io(&tag_dir, e))
            .context("creating tag directory")?;

        let staging = self.staging_dir(key);
        if staging.exists() {
            tracing::debug!("Removing stale staging directory {}", staging.display());
            fs::remove_dir_all(&staging).map_err(|e| SyscapError::io(&staging, e))?;
        }
        create_private_dir(&staging)
            .map_err(|e| SyscapError::io(&staging, e))
            .context("creating snapshot staging directory")?;

        for item in items {
            let path = staging.join(encode_item_name(&item.name));
            fs::write(&path, &item.content)
                .map_err(|e| SyscapError::io(&path, e))
                .with_context(|| format!("writing item '{}'", item.name))?;
        }

        let manifest_path = staging.join(MANIFEST_FILE_NAME);
        let manifest_json = serde_json::to_vec_pretty(manifest)
            .map_err(|e| SyscapError::Report(format!("manifest serialization: {e}")))?;
        fs::write(&manifest_path, manifest_json).map_err(|e| SyscapError::io(&manifest_path, e))?;

        let target = self.snapshot_dir(key);
        if target.exists() {
            tracing::info!("Replacing existing snapshot {key}");
            fs::remove_dir_all(&target)
                .map_err(|e| SyscapError::io(&target, e))
                .context("removing previous snapshot")?;
        }
        fs::rename(&staging, &target)
            .map_err(|e| SyscapError::io(&target, e))
            .context("moving snapshot into place")?;

        Ok(target)
    }

    /// Read a snapshot back.
    ///
    /// Fails with [`SyscapError::SnapshotNotFound`] when the phase directory
    /// does not exist. Files whose names do not decode to an item name are
    /// skipped with a warning.
    pub fn read_snapshot(&self, key: &SnapshotKey) -> Result<Snapshot> {
        let dir = self.snapshot_dir(key);
        if !dir.is_dir() {
            let available = self.list_phases(key.tag()).unwrap_or_default();
            return Err(SyscapError::snapshot_not_found(
                key.tag(),
                key.phase(),
                available,
            ));
        }

        let mut snapshot = Snapshot::new(key.clone());
        let entries = fs::read_dir(&dir).map_err(|e| SyscapError::io(&dir, e))?;
        for entry in entries {
            let entry = entry.map_err(|e| SyscapError::io(&dir, e))?;
            let file_name = entry.file_name();
            let Some(file_name) = file_name.to_str() else {
                tracing::warn!("Ignoring non-UTF-8 file name in {}", dir.display());
                continue;
            };
            if file_name.starts_with('.') || !entry.path().is_file() {
                continue;
            }
            let Some(item_name) = decode_item_name(file_name) else {
                tracing::warn!("Ignoring unrecognised file {file_name} in snapshot {key}");
                continue;
            };
            let path = entry.path();
            let content = fs::read(&path).map_err(|e| SyscapError::io(&path, e))?;
            snapshot.items.insert(item_name, content);
        }

        snapshot.manifest = read_manifest(&dir.join(MANIFEST_FILE_NAME));
        tracing::debug!(
            "Loaded snapshot {key} with {} items",
            snapshot.item_count()
        );
        Ok(snapshot)
    }
}

fn read_manifest(path: &Path) -> Option<Manifest> {
    let content = fs::read(path).ok()?;
    match serde_json::from_slice(&content) {
        Ok(manifest) => Some(manifest),
        Err(e) => {
            tracing::warn!("Ignoring unreadable manifest {}: {e}", path.display());
            None
        }
    }
}

fn list_visible_dirs(dir: &Path) -> Result<Vec<String>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut names = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| SyscapError::io(dir, e))? {
        let entry = entry.map_err(|e| SyscapError::io(dir, e))?;
        if !entry.path().is_dir() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            if !name.starts_with('.') {
                names.push(name.to_string());
            }
        }
    }
    names.sort();
    Ok(names)
}

#[cfg(unix)]
fn create_private_dir(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    fs::DirBuilder::new().mode(0o750).create(path)
}

#[cfg(not(unix))]
fn create_private_dir(path: &Path) -> std::io::Result<()> {
    fs::create_dir(path)
}
