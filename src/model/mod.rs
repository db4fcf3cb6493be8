//! Data model for snapshots.
//!
//! A [`Snapshot`] is identified by a [`SnapshotKey`] (`tag`, `phase`) and
//! holds the raw content of each captured item keyed by item name.

mod item;
mod snapshot;

pub use item::{CapturedItem, ItemSource, ItemStatus};
pub use snapshot::{validate_segment, Snapshot, SnapshotKey, MAX_SEGMENT_LEN};
