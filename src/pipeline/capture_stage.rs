//! Capture stage: run every configured source and store the snapshot.

use crate::capture::{CaptureResult, Capturer, CommandRunner};
use crate::config::{CaptureCommandConfig, Validatable};
use crate::error::SyscapError;
use crate::model::SnapshotKey;
use crate::storage::SnapshotStore;
use anyhow::Result;

/// Capture `config.capture` into `<storage_root>/<tag>/<phase>`.
///
/// Tag, phase, base directory and capture list are all checked before the
/// first item is captured.
pub fn capture_snapshot<R: CommandRunner>(
    config: &CaptureCommandConfig,
    runner: R,
) -> Result<CaptureResult> {
    let key = SnapshotKey::new(&config.tag, &config.phase)?;

    let errors = config.capture.validate();
    if !errors.is_empty() {
        let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
        return Err(SyscapError::config(messages.join("; ")).into());
    }

    let capturer = Capturer::with_runner(&config.base_dir, runner)?
        .with_timeout(config.capture.command_timeout());
    let store = SnapshotStore::new(&config.storage_root);
    Ok(capturer.capture_to_store(&config.capture, &store, &key)?)
}
