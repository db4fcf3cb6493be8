//! Item-by-item snapshot comparison.

use super::result::{ChangeKind, ItemDiff, SnapshotDiff};
use crate::model::Snapshot;
use similar::{ChangeTag, TextDiff};
use std::collections::BTreeSet;

/// Lines of context around each hunk, as `diff -u` uses.
pub const DEFAULT_CONTEXT_RADIUS: usize = 3;

/// Compares two snapshots line by line.
#[derive(Debug, Clone, Copy)]
pub struct DiffEngine {
    context_radius: usize,
}

impl Default for DiffEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl DiffEngine {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            context_radius: DEFAULT_CONTEXT_RADIUS,
        }
    }

    #[must_use]
    pub const fn with_context_radius(mut self, radius: usize) -> Self {
        self.context_radius = radius;
        self
    }

    /// Compare `old` against `new`.
    ///
    /// Every item name present in either snapshot is reported once, in
    /// lexicographic order. An item missing from one side is compared as
    /// empty content.
    #[must_use]
    pub fn diff(&self, old: &Snapshot, new: &Snapshot) -> SnapshotDiff {
        let mut result = SnapshotDiff::new(old.key.tag(), old.key.phase(), new.key.phase());
        result.old_captured_at = old.manifest.as_ref().map(|m| m.captured_at);
        result.new_captured_at = new.manifest.as_ref().map(|m| m.captured_at);

        let names: BTreeSet<&String> = old.items.keys().chain(new.items.keys()).collect();
        for name in names {
            let old_content = old.item(name);
            let new_content = new.item(name);

            let change = match (old_content, new_content) {
                (Some(a), Some(b)) if a == b => ChangeKind::Unchanged,
                (Some(_), Some(_)) => ChangeKind::Modified,
                (None, _) => {
                    tracing::warn!("Item {name} missing from phase {}", old.key.phase());
                    ChangeKind::Added
                }
                (Some(_), None) => {
                    tracing::warn!("Item {name} missing from phase {}", new.key.phase());
                    ChangeKind::Removed
                }
            };

            let mut item = ItemDiff {
                name: name.clone(),
                change,
                old_status: old.manifest.as_ref().and_then(|m| m.status_of(name)),
                new_status: new.manifest.as_ref().and_then(|m| m.status_of(name)),
                lines_added: 0,
                lines_removed: 0,
                unified: String::new(),
            };

            if change.is_change() {
                let old_text = String::from_utf8_lossy(old_content.unwrap_or_default());
                let new_text = String::from_utf8_lossy(new_content.unwrap_or_default());
                let old_label = diff_label(old, name);
                let new_label = diff_label(new, name);
                self.fill_line_diff(&mut item, &old_text, &new_text, &old_label, &new_label);
            }

            tracing::debug!("Compared {name}: {change}");
            result.push(item);
        }

        result
    }

    fn fill_line_diff(
        &self,
        item: &mut ItemDiff,
        old_text: &str,
        new_text: &str,
        old_label: &str,
        new_label: &str,
    ) {
        let diff = TextDiff::from_lines(old_text, new_text);
        for change in diff.iter_all_changes() {
            match change.tag() {
                ChangeTag::Insert => item.lines_added += 1,
                ChangeTag::Delete => item.lines_removed += 1,
                ChangeTag::Equal => {}
            }
        }
        if item.lines_added + item.lines_removed > 0 {
            item.unified = diff
                .unified_diff()
                .context_radius(self.context_radius)
                .header(old_label, new_label)
                .to_string();
        }
    }
}

/// `<tag>/<phase>/<item>` with the item's leading slashes dropped.
fn diff_label(snapshot: &Snapshot, name: &str) -> String {
    format!(
        "{}/{}/{}",
        snapshot.key.tag(),
        snapshot.key.phase(),
        name.trim_start_matches('/')
    )
}
