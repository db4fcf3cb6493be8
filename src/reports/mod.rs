//! Report generation for diff results.
//!
//! This module provides two output formats for snapshot diffs:
//! - Text: unified diff per changed item with a summary footer
//! - JSON: structured data for programmatic integration

mod json;
mod text;
mod types;

pub use json::JsonReporter;
pub use text::TextReporter;
pub use types::ReportFormat;

use crate::diff::SnapshotDiff;
use thiserror::Error;

/// Errors that can occur during report generation
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<ReportError> for crate::error::SyscapError {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::IoError(source) => Self::from(source),
            ReportError::SerializationError(message) => Self::Report(message),
        }
    }
}

/// Trait for report generators
pub trait ReportGenerator {
    /// Generate a report from a diff result
    fn generate_diff_report(&self, result: &SnapshotDiff) -> Result<String, ReportError>;

    /// Get the format this generator produces
    fn format(&self) -> ReportFormat;
}

/// Create a report generator with color control
#[must_use]
pub fn create_reporter_with_options(
    format: ReportFormat,
    use_color: bool,
) -> Box<dyn ReportGenerator> {
    match format {
        ReportFormat::Text => {
            if use_color {
                Box::new(TextReporter::new())
            } else {
                Box::new(TextReporter::new().no_color())
            }
        }
        ReportFormat::Json => Box::new(JsonReporter::new()),
    }
}
