//! Diff command handler.
//!
//! Implements diff mode: compare two captured phases of one tag.

use crate::config::DiffCommandConfig;
use crate::diff::SnapshotDiff;
use crate::pipeline::{compute_diff, exit_codes, output_report};
use crate::storage::SnapshotStore;
use anyhow::Result;

/// Run diff mode, returning the desired exit code.
///
/// Differences are a successful result unless `fail_on_change` is set.
/// The caller is responsible for calling `std::process::exit()` with the
/// returned code when it is non-zero.
#[allow(clippy::needless_pass_by_value)]
pub fn run_diff(config: DiffCommandConfig) -> Result<i32> {
    let store = SnapshotStore::new(&config.storage_root);
    let result = compute_diff(&store, &config.tag, &config.old_phase, &config.new_phase)?;

    output_report(&config.output, &result)?;

    Ok(determine_exit_code(&config, &result))
}

/// Determine the appropriate exit code based on diff results and config flags.
const fn determine_exit_code(config: &DiffCommandConfig, result: &SnapshotDiff) -> i32 {
    if config.fail_on_change && result.has_changes() {
        return exit_codes::CHANGES_DETECTED;
    }
    exit_codes::SUCCESS
}
