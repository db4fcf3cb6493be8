//! Report output stage.

use crate::config::OutputConfig;
use crate::diff::SnapshotDiff;
use crate::error::SyscapError;
use crate::reports::create_reporter_with_options;
use anyhow::Result;

use super::{should_use_color, write_output, OutputTarget};

/// Render a diff report and write it to the configured destination.
pub fn output_report(output: &OutputConfig, result: &SnapshotDiff) -> Result<()> {
    let target = OutputTarget::from_option(output.file.clone());
    let use_color = should_use_color(output.no_color, &target);
    let reporter = create_reporter_with_options(output.format, use_color);
    let report = reporter
        .generate_diff_report(result)
        .map_err(SyscapError::from)?;
    write_output(&report, &target)
}
