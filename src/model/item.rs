//! Captured items and their sources.

use crate::config::{CaptureConfig, CommandGroup};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Where an item's content comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemSource {
    /// A file read relative to the base directory
    File(PathBuf),
    /// A group of commands whose outputs are concatenated
    Commands(CommandGroup),
}

impl ItemSource {
    /// Logical item name: the path as configured, or the group name.
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::File(path) => path.display().to_string(),
            Self::Commands(group) => group.name.clone(),
        }
    }

    /// Short human-readable description, stored in the manifest.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::File(path) => format!("file {}", path.display()),
            Self::Commands(group) => format!("exec {}", group.exec.join(" ; ")),
        }
    }

    /// All sources of a capture list: command groups first, then files.
    #[must_use]
    pub fn from_config(config: &CaptureConfig) -> Vec<Self> {
        config
            .commands
            .iter()
            .cloned()
            .map(Self::Commands)
            .chain(config.files.iter().cloned().map(Self::File))
            .collect()
    }
}

/// Outcome of capturing one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    /// Content captured in full
    Captured,
    /// Source file did not exist; content is empty
    Absent,
    /// At least one read or command failed; markers are inline
    Failed,
    /// Command group skipped because its required path was missing
    Skipped,
}

impl ItemStatus {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Captured => "captured",
            Self::Absent => "absent",
            Self::Failed => "failed",
            Self::Skipped => "skipped",
        }
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One item of a snapshot, as produced by a capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedItem {
    pub name: String,
    pub source: ItemSource,
    pub status: ItemStatus,
    /// Raw bytes written to storage
    pub content: Vec<u8>,
}
