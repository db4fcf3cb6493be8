//! Diff result types.

use crate::model::ItemStatus;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// How an item differs between the two snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Unchanged,
    Modified,
    /// Only present in the new snapshot
    Added,
    /// Only present in the old snapshot
    Removed,
}

impl ChangeKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unchanged => "unchanged",
            Self::Modified => "modified",
            Self::Added => "added",
            Self::Removed => "removed",
        }
    }

    #[must_use]
    pub const fn is_change(&self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

impl std::fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Comparison of one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemDiff {
    pub name: String,
    pub change: ChangeKind,
    /// Status from the old snapshot's manifest
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_status: Option<ItemStatus>,
    /// Status from the new snapshot's manifest
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_status: Option<ItemStatus>,
    pub lines_added: usize,
    pub lines_removed: usize,
    /// Unified diff text; empty for unchanged items
    #[serde(skip_serializing_if = "String::is_empty")]
    pub unified: String,
}

impl ItemDiff {
    /// Status transition such as `absent -> captured`, when both sides
    /// have a known status and it changed.
    #[must_use]
    pub fn status_transition(&self) -> Option<(ItemStatus, ItemStatus)> {
        match (self.old_status, self.new_status) {
            (Some(old), Some(new)) if old != new => Some((old, new)),
            _ => None,
        }
    }
}

/// Counts over all compared items.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DiffSummary {
    pub total_items: usize,
    pub modified: usize,
    pub added: usize,
    pub removed: usize,
    pub unchanged: usize,
}

impl DiffSummary {
    #[must_use]
    pub const fn total_changes(&self) -> usize {
        self.modified + self.added + self.removed
    }

    fn record(&mut self, change: ChangeKind) {
        self.total_items += 1;
        match change {
            ChangeKind::Unchanged => self.unchanged += 1,
            ChangeKind::Modified => self.modified += 1,
            ChangeKind::Added => self.added += 1,
            ChangeKind::Removed => self.removed += 1,
        }
    }
}

/// Comparison of two snapshots of one tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnapshotDiff {
    pub tag: String,
    pub old_phase: String,
    pub new_phase: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_captured_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_captured_at: Option<DateTime<Utc>>,
    /// Every item of either snapshot, sorted by name
    pub items: Vec<ItemDiff>,
    pub summary: DiffSummary,
}

impl SnapshotDiff {
    /// Create an empty diff.
    pub fn new(
        tag: impl Into<String>,
        old_phase: impl Into<String>,
        new_phase: impl Into<String>,
    ) -> Self {
        Self {
            tag: tag.into(),
            old_phase: old_phase.into(),
            new_phase: new_phase.into(),
            old_captured_at: None,
            new_captured_at: None,
            items: Vec::new(),
            summary: DiffSummary::default(),
        }
    }

    /// Append an item and update the summary.
    pub fn push(&mut self, item: ItemDiff) {
        self.summary.record(item.change);
        self.items.push(item);
    }

    #[must_use]
    pub const fn has_changes(&self) -> bool {
        self.summary.total_changes() > 0
    }

    /// Items that differ, in name order.
    pub fn changed_items(&self) -> impl Iterator<Item = &ItemDiff> {
        self.items.iter().filter(|item| item.change.is_change())
    }

    /// Look up an item by name.
    #[must_use]
    pub fn item(&self, name: &str) -> Option<&ItemDiff> {
        self.items.iter().find(|item| item.name == name)
    }
}
