//! Line-level diff engine for snapshots.
//!
//! Two snapshots of one tag are compared item by item. Every item name
//! present in either snapshot yields exactly one [`ItemDiff`], in
//! lexicographic name order; an item missing from one side is compared as
//! empty content. Changed items carry a unified diff with three lines of
//! context, labelled `<tag>/<phase>/<item>`.
//!
//! # Example
//!
//! ```ignore
//! use syscap::diff::DiffEngine;
//!
//! let result = DiffEngine::new().diff(&pre, &post);
//! for item in result.changed_items() {
//!     print!("{}", item.unified);
//! }
//! ```

mod engine;
mod result;

pub use engine::{DiffEngine, DEFAULT_CONTEXT_RADIUS};
pub use result::{ChangeKind, DiffSummary, ItemDiff, SnapshotDiff};
