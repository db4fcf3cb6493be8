//! Capture command handler.
//!
//! Implements capture mode: snapshot every configured source under a phase.

use crate::capture::ShellRunner;
use crate::config::CaptureCommandConfig;
use crate::model::ItemStatus;
use crate::pipeline::{capture_snapshot, exit_codes};
use anyhow::Result;

/// Run capture mode, returning the desired exit code.
///
/// Failing items do not change the exit code; they are recorded in the
/// snapshot itself.
#[allow(clippy::needless_pass_by_value)]
pub fn run_capture(config: CaptureCommandConfig) -> Result<i32> {
    let result = capture_snapshot(&config, ShellRunner::new())?;
    let manifest = &result.manifest;

    tracing::info!(
        "Captured {} items into {} ({} absent, {} failed, {} skipped)",
        manifest.items.len(),
        result.snapshot_dir.display(),
        manifest.count_with_status(ItemStatus::Absent),
        manifest.count_with_status(ItemStatus::Failed),
        manifest.count_with_status(ItemStatus::Skipped),
    );

    Ok(exit_codes::SUCCESS)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::config::{CaptureConfig, CommandGroup};
    use tempfile::TempDir;

    #[test]
    fn test_run_capture_with_shell() {
        let base = TempDir::new().unwrap();
        let storage = TempDir::new().unwrap();
        std::fs::write(base.path().join("motd"), "hello").unwrap();
        let config = CaptureCommandConfig {
            base_dir: base.path().to_path_buf(),
            tag: "t1".to_string(),
            phase: "pre".to_string(),
            storage_root: storage.path().to_path_buf(),
            capture: CaptureConfig::builder()
                .command_group(CommandGroup::new("listing", ["ls"]))
                .file("/motd")
                .build(),
        };

        assert_eq!(run_capture(config).unwrap(), exit_codes::SUCCESS);

        let dir = storage.path().join("t1/pre");
        assert_eq!(std::fs::read_to_string(dir.join("listing")).unwrap(), "## ls\nmotd\n");
        assert_eq!(std::fs::read_to_string(dir.join("%2Fmotd")).unwrap(), "hello");
    }
}
