//! Configuration types for syscap operations.
//!
//! [`CaptureConfig`] is the file-backed description of what to capture.
//! [`CaptureCommandConfig`] and [`DiffCommandConfig`] are the per-invocation
//! settings assembled by the binary from CLI flags.

use crate::reports::ReportFormat;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use super::defaults::DEFAULT_COMMAND_TIMEOUT_SECS;

// ============================================================================
// Capture list
// ============================================================================

/// The set of files and command groups captured into every snapshot.
///
/// Field aliases accept the key names of the legacy `capture.json` format
/// (`command_groups`, `file_list`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct CaptureConfig {
    /// Where snapshots are stored (overridden by `--storage-root` and
    /// `SYSCAP_STORAGE_ROOT`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_root: Option<PathBuf>,
    /// Per-command execution timeout in seconds
    pub command_timeout_secs: u64,
    /// Command groups; each group becomes one captured item
    #[serde(alias = "command_groups")]
    pub commands: Vec<CommandGroup>,
    /// Files to capture, read relative to the base directory
    #[serde(alias = "file_list")]
    pub files: Vec<PathBuf>,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            storage_root: None,
            command_timeout_secs: DEFAULT_COMMAND_TIMEOUT_SECS,
            commands: Vec::new(),
            files: Vec::new(),
        }
    }
}

impl CaptureConfig {
    /// Create an empty capture list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a `CaptureConfig` builder.
    pub fn builder() -> CaptureConfigBuilder {
        CaptureConfigBuilder::default()
    }

    /// Command timeout as a [`Duration`].
    #[must_use]
    pub const fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs)
    }

    /// Number of items a capture of this config produces.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.commands.len() + self.files.len()
    }
}

/// A named group of commands whose outputs form a single item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CommandGroup {
    /// Item name for the combined output
    #[serde(alias = "outfile")]
    pub name: String,
    /// Commands run in order through the shell
    pub exec: Vec<String>,
    /// Skip the group unless this path exists under the base directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub require: Option<PathBuf>,
}

impl CommandGroup {
    /// Create a group without a `require` guard.
    pub fn new(name: impl Into<String>, exec: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            name: name.into(),
            exec: exec.into_iter().map(Into::into).collect(),
            require: None,
        }
    }

    /// Attach a `require` guard.
    #[must_use]
    pub fn requiring(mut self, path: impl Into<PathBuf>) -> Self {
        self.require = Some(path.into());
        self
    }
}

// ============================================================================
// Builder for CaptureConfig
// ============================================================================

/// Builder for constructing `CaptureConfig` with fluent API.
#[derive(Debug, Default)]
#[must_use]
pub struct CaptureConfigBuilder {
    config: CaptureConfig,
}

impl CaptureConfigBuilder {
    /// Add a command group.
    pub fn command_group(mut self, group: CommandGroup) -> Self {
        self.config.commands.push(group);
        self
    }

    /// Add a single-command group.
    pub fn command(self, name: impl Into<String>, exec: impl Into<String>) -> Self {
        self.command_group(CommandGroup::new(name, [exec.into()]))
    }

    /// Add a file to capture.
    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.files.push(path.into());
        self
    }

    /// Set the command timeout in seconds.
    pub const fn command_timeout_secs(mut self, secs: u64) -> Self {
        self.config.command_timeout_secs = secs;
        self
    }

    /// Set the storage root.
    pub fn storage_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.config.storage_root = Some(root.into());
        self
    }

    /// Build the configuration.
    pub fn build(self) -> CaptureConfig {
        self.config
    }
}

// ============================================================================
// Command configurations
// ============================================================================

/// Settings for one capture invocation.
#[derive(Debug, Clone)]
pub struct CaptureCommandConfig {
    /// Directory configured file paths are resolved against
    pub base_dir: PathBuf,
    /// Snapshot tag
    pub tag: String,
    /// Phase label being captured
    pub phase: String,
    /// Resolved storage root
    pub storage_root: PathBuf,
    /// What to capture
    pub capture: CaptureConfig,
}

/// Settings for one diff invocation.
#[derive(Debug, Clone)]
pub struct DiffCommandConfig {
    /// Snapshot tag
    pub tag: String,
    /// Phase treated as the old side
    pub old_phase: String,
    /// Phase treated as the new side
    pub new_phase: String,
    /// Resolved storage root
    pub storage_root: PathBuf,
    /// Report output settings
    pub output: OutputConfig,
    /// Exit with a non-zero code when any item changed
    pub fail_on_change: bool,
}

/// Report output settings.
#[derive(Debug, Clone, Default)]
pub struct OutputConfig {
    /// Report format
    pub format: ReportFormat,
    /// Output file path (stdout when `None`)
    pub file: Option<PathBuf>,
    /// Disable ANSI colors
    pub no_color: bool,
}
