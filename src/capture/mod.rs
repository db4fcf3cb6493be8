//! Snapshot capture.
//!
//! A [`Capturer`] turns every source of a [`CaptureConfig`] into a
//! [`CapturedItem`]. Item-level problems (missing files, failing commands,
//! timeouts) never abort a capture: they are written into the item content
//! as lines starting with [`FAILURE_MARKER`] and reflected in the item
//! status, so a later diff shows when an item started or stopped failing.

mod runner;

pub use runner::{CommandOutcome, CommandRunner, ShellRunner};

use crate::config::{CaptureConfig, CommandGroup, DEFAULT_COMMAND_TIMEOUT_SECS};
use crate::error::{Result, SyscapError};
use crate::model::{CapturedItem, ItemSource, ItemStatus, SnapshotKey};
use crate::storage::{Manifest, SnapshotStore};
use chrono::Utc;
use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;

/// Prefix of inline failure lines in captured content.
pub const FAILURE_MARKER: &str = "!!";

/// Prefix of the per-command section header in command group content.
pub const COMMAND_HEADER: &str = "##";

/// Resolve a configured path against the base directory.
///
/// Absolute paths are re-rooted under `base`, so `/etc/hosts` with base
/// `/mnt/sysroot` reads `/mnt/sysroot/etc/hosts`.
#[must_use]
pub fn resolve_under(base: &Path, path: &Path) -> PathBuf {
    let relative: PathBuf = path
        .components()
        .filter(|c| !matches!(c, Component::RootDir | Component::Prefix(_)))
        .collect();
    base.join(relative)
}

/// Result of a capture written to storage.
#[derive(Debug, Clone)]
pub struct CaptureResult {
    /// Directory the snapshot was written to
    pub snapshot_dir: PathBuf,
    /// Manifest written alongside the items
    pub manifest: Manifest,
}

/// Captures items relative to a base directory.
#[derive(Debug, Clone)]
pub struct Capturer<R = ShellRunner> {
    base_dir: PathBuf,
    timeout: Duration,
    runner: R,
}

impl Capturer<ShellRunner> {
    /// Capturer running commands through `/bin/sh`.
    pub fn new(base_dir: impl Into<PathBuf>) -> Result<Self> {
        Self::with_runner(base_dir, ShellRunner::new())
    }
}

impl<R: CommandRunner> Capturer<R> {
    /// Capturer with a custom command runner.
    ///
    /// Fails with [`SyscapError::BaseDirMissing`] unless `base_dir` is an
    /// existing directory.
    pub fn with_runner(base_dir: impl Into<PathBuf>, runner: R) -> Result<Self> {
        let base_dir = base_dir.into();
        if !base_dir.is_dir() {
            return Err(SyscapError::BaseDirMissing { path: base_dir });
        }
        Ok(Self {
            base_dir,
            timeout: Duration::from_secs(DEFAULT_COMMAND_TIMEOUT_SECS),
            runner,
        })
    }

    /// Set the per-command timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Capture every source of `config`, in configuration order.
    pub fn capture_all(&self, config: &CaptureConfig) -> Vec<CapturedItem> {
        ItemSource::from_config(config)
            .into_iter()
            .map(|source| self.capture_item(source))
            .collect()
    }

    /// Capture one source.
    pub fn capture_item(&self, source: ItemSource) -> CapturedItem {
        let name = source.name();
        let (status, content) = match &source {
            ItemSource::File(path) => self.capture_file(path),
            ItemSource::Commands(group) => self.capture_commands(group),
        };
        tracing::debug!("Captured {name}: {status}, {} bytes", content.len());
        CapturedItem {
            name,
            source,
            status,
            content,
        }
    }

    /// Capture `config` and write it as snapshot `key`, replacing any
    /// previous snapshot with that key.
    pub fn capture_to_store(
        &self,
        config: &CaptureConfig,
        store: &SnapshotStore,
        key: &SnapshotKey,
    ) -> Result<CaptureResult> {
        tracing::info!(
            "Capturing {} items into {key} from {}",
            config.item_count(),
            self.base_dir.display()
        );
        let items = self.capture_all(config);
        let manifest = Manifest::from_items(key, &self.base_dir, &items, Utc::now());
        let snapshot_dir = store.write_snapshot(key, &items, &manifest)?;
        Ok(CaptureResult {
            snapshot_dir,
            manifest,
        })
    }

    fn capture_file(&self, path: &Path) -> (ItemStatus, Vec<u8>) {
        let full_path = resolve_under(&self.base_dir, path);
        match fs::read(&full_path) {
            Ok(content) => (ItemStatus::Captured, content),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::warn!("File {} is absent", full_path.display());
                (ItemStatus::Absent, Vec::new())
            }
            Err(e) => {
                tracing::warn!("Could not read {}: {e}", full_path.display());
                (
                    ItemStatus::Failed,
                    format!("{FAILURE_MARKER} read failed: {e}\n").into_bytes(),
                )
            }
        }
    }

    fn capture_commands(&self, group: &CommandGroup) -> (ItemStatus, Vec<u8>) {
        if let Some(required) = &group.require {
            if !resolve_under(&self.base_dir, required).exists() {
                tracing::warn!(
                    "Skipping command group {}: {} not found",
                    group.name,
                    required.display()
                );
                let marker = format!(
                    "{FAILURE_MARKER} skipped: required path {} not found\n",
                    required.display()
                );
                return (ItemStatus::Skipped, marker.into_bytes());
            }
        }

        let mut content = Vec::new();
        let mut status = ItemStatus::Captured;
        for command in &group.exec {
            content.extend_from_slice(format!("{COMMAND_HEADER} {command}\n").as_bytes());
            tracing::debug!("Running {command}");
            let outcome = self.runner.run(command, &self.base_dir, self.timeout);
            if !outcome.is_success() {
                tracing::warn!("Command failed in group {}: {command}", group.name);
                status = ItemStatus::Failed;
            }
            self.append_outcome(&mut content, outcome);
        }
        (status, content)
    }

    fn append_outcome(&self, content: &mut Vec<u8>, outcome: CommandOutcome) {
        match outcome {
            CommandOutcome::Exited {
                stdout,
                code: Some(0),
                ..
            } => {
                content.extend_from_slice(&stdout);
                if !stdout.is_empty() && !stdout.ends_with(b"\n") {
                    content.push(b'\n');
                }
            }
            CommandOutcome::Exited { stderr, code, .. } => {
                let reason = code.map_or_else(
                    || "killed by signal".to_string(),
                    |code| format!("exit status {code}"),
                );
                push_line(content, &format!("{FAILURE_MARKER} {reason}"));
                for line in String::from_utf8_lossy(&stderr).lines() {
                    push_line(content, &format!("{FAILURE_MARKER} {line}"));
                }
            }
            CommandOutcome::TimedOut => {
                push_line(
                    content,
                    &format!(
                        "{FAILURE_MARKER} timed out after {}s",
                        self.timeout.as_secs_f64()
                    ),
                );
            }
            CommandOutcome::SpawnFailed(message) => {
                push_line(
                    content,
                    &format!("{FAILURE_MARKER} could not execute: {message}"),
                );
            }
        }
    }
}

fn push_line(content: &mut Vec<u8>, line: &str) {
    content.extend_from_slice(line.as_bytes());
    content.push(b'\n');
}
