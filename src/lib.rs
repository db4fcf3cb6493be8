//! **Capture system state snapshots and diff them between phases.**
//!
//! `syscap` records a configured set of files and command outputs as a named
//! snapshot (a *tag* plus a *phase* label such as `pre` or `post`) and later
//! shows a unified diff of every item that changed between two phases of the
//! same tag. Typical use is bracketing an upgrade or configuration change:
//! capture `pre`, make the change, capture `post`, diff.
//!
//! ## Core Concepts & Modules
//!
//! - **[`config`]**: The capture list ([`CaptureConfig`]): command groups and
//!   files, with a built-in default, YAML/JSON loading and validation.
//! - **[`capture`]**: The [`Capturer`], which turns each configured source
//!   into a captured item. Commands run behind the [`CommandRunner`] trait.
//! - **[`storage`]**: The on-disk [`SnapshotStore`]:
//!   `<root>/<tag>/<phase>/<item-file>` plus a `.manifest.json` per snapshot.
//! - **[`diff`]**: The [`DiffEngine`], a line-level comparison of two
//!   snapshots producing a [`SnapshotDiff`].
//! - **[`reports`]**: Text and JSON renderings of a diff.
//! - **[`pipeline`]**: Capture and diff stages shared by the CLI handlers,
//!   plus the exit code table.
//!
//! ## Capturing and diffing
//!
//! ```no_run
//! use syscap::{CaptureConfig, Capturer, DiffEngine, SnapshotKey, SnapshotStore};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = CaptureConfig::builder()
//!         .command("kernel", "uname -r")
//!         .file("/etc/motd")
//!         .build();
//!     let store = SnapshotStore::new("/var/lib/syscap");
//!     let capturer = Capturer::new("/")?;
//!
//!     let pre = SnapshotKey::new("upgrade", "pre")?;
//!     capturer.capture_to_store(&config, &store, &pre)?;
//!     // ... perform the upgrade ...
//!     let post = SnapshotKey::new("upgrade", "post")?;
//!     capturer.capture_to_store(&config, &store, &post)?;
//!
//!     let diff = DiffEngine::new().diff(&store.read_snapshot(&pre)?, &store.read_snapshot(&post)?);
//!     for item in diff.changed_items() {
//!         print!("{}", item.unified);
//!     }
//!     Ok(())
//! }
//! ```

#![warn(clippy::unwrap_used)]
#![allow(clippy::module_name_repetitions, clippy::must_use_candidate)]

pub mod capture;
pub mod cli;
pub mod config;
pub mod diff;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod reports;
pub mod storage;
pub mod utils;

// Re-export main types for convenience
pub use capture::{CaptureResult, Capturer, CommandOutcome, CommandRunner, ShellRunner};
pub use config::{CaptureConfig, CommandGroup};
pub use diff::{ChangeKind, DiffEngine, ItemDiff, SnapshotDiff};
pub use error::{ErrorContext, Result, SyscapError};
pub use model::{CapturedItem, ItemSource, ItemStatus, Snapshot, SnapshotKey};
pub use reports::{ReportFormat, ReportGenerator};
pub use storage::{Manifest, SnapshotStore};
