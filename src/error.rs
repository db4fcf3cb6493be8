//! Unified error types for syscap.
//!
//! Only configuration problems, snapshot lookups and storage I/O surface as
//! errors. Failures of individual captured items are data, not errors, and
//! are written into the item content instead (see [`crate::capture`]).

use crate::pipeline::exit_codes;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for syscap operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SyscapError {
    /// Invalid or missing arguments and configuration values
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// A tag or phase label that cannot be used as a path segment
    #[error("Invalid {kind} '{value}': {reason}")]
    InvalidName {
        kind: &'static str,
        value: String,
        reason: String,
    },

    /// The capture base directory does not exist or is not a directory
    #[error("Base directory not found: {}", path.display())]
    BaseDirMissing { path: PathBuf },

    /// Diff requested against a phase that was never captured
    #[error("Snapshot not found: tag '{tag}', phase '{phase}'{}", available_hint(available))]
    SnapshotNotFound {
        tag: String,
        phase: String,
        available: Vec<String>,
    },

    /// Errors reading or parsing a config file
    #[error("Config file {}: {source}", path.display())]
    ConfigFile {
        path: PathBuf,
        #[source]
        source: crate::config::ConfigFileError,
    },

    /// Errors rendering a report
    #[error("Report generation failed: {0}")]
    Report(String),

    /// IO errors with context
    #[error("IO error at {path:?}: {message}")]
    Io {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },
}

fn available_hint(available: &[String]) -> String {
    if available.is_empty() {
        String::new()
    } else {
        format!(" (available phases: {})", available.join(", "))
    }
}

/// Convenient Result type for syscap operations
pub type Result<T> = std::result::Result<T, SyscapError>;

impl SyscapError {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create an invalid tag/phase error
    pub fn invalid_name(
        kind: &'static str,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidName {
            kind,
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a snapshot-not-found error
    pub fn snapshot_not_found(
        tag: impl Into<String>,
        phase: impl Into<String>,
        available: Vec<String>,
    ) -> Self {
        Self::SnapshotNotFound {
            tag: tag.into(),
            phase: phase.into(),
            available,
        }
    }

    /// Create an IO error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        let message = format!("{source}");
        Self::Io {
            path: Some(path),
            message,
            source,
        }
    }

    /// Process exit code for this error kind.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_)
            | Self::InvalidName { .. }
            | Self::BaseDirMissing { .. }
            | Self::ConfigFile { .. } => exit_codes::CONFIG_ERROR,
            Self::SnapshotNotFound { .. } => exit_codes::SNAPSHOT_NOT_FOUND,
            Self::Report(_) | Self::Io { .. } => exit_codes::IO_ERROR,
        }
    }
}

impl From<std::io::Error> for SyscapError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            path: None,
            message: format!("{err}"),
            source: err,
        }
    }
}

// ============================================================================
// Error context extension trait
// ============================================================================

/// Extension trait for adding context to errors.
///
/// Context strings are chained onto configuration and IO messages, so a
/// failure deep in snapshot storage still reports which operation it
/// belonged to.
///
/// ```ignore
/// use syscap::error::ErrorContext;
///
/// std::fs::create_dir_all(&dir).context("creating snapshot staging directory")?;
/// ```
pub trait ErrorContext<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context from a closure, evaluated only on error.
    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: Into<SyscapError>> ErrorContext<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        let ctx: String = context.into();
        self.map_err(|e| add_context_to_error(e.into(), &ctx))
    }

    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| {
            let ctx: String = f().into();
            add_context_to_error(e.into(), &ctx)
        })
    }
}

/// Add context to an error, chaining with any existing context.
///
/// Structured variants keep their fields untouched.
fn add_context_to_error(err: SyscapError, new_ctx: &str) -> SyscapError {
    match err {
        SyscapError::Io {
            path,
            message,
            source,
        } => SyscapError::Io {
            path,
            message: chain_context(new_ctx, &message),
            source,
        },
        SyscapError::Config(msg) => SyscapError::Config(chain_context(new_ctx, &msg)),
        SyscapError::Report(msg) => SyscapError::Report(chain_context(new_ctx, &msg)),
        other => other,
    }
}

/// Returns "`new`: `existing`", or just `new` when nothing exists yet.
fn chain_context(new: &str, existing: &str) -> String {
    if existing.is_empty() {
        new.to_string()
    } else {
        format!("{new}: {existing}")
    }
}
