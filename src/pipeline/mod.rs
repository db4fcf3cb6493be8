//! Pipeline orchestration for syscap operations.
//!
//! This module provides the shared capture → store and load → diff → report
//! stages used by the CLI command handlers.

mod capture_stage;
mod diff_stage;
mod output;
mod report_stage;

pub use capture_stage::capture_snapshot;
pub use diff_stage::compute_diff;
pub use output::{should_use_color, write_output, OutputTarget};
pub use report_stage::output_report;

/// Exit codes for scripting and CI integration
pub mod exit_codes {
    /// Success, including a diff with differences unless --fail-on-change
    pub const SUCCESS: i32 = 0;
    /// Changes were detected and --fail-on-change was given
    pub const CHANGES_DETECTED: i32 = 1;
    /// Bad arguments, invalid tag/phase, missing base dir or bad config file
    pub const CONFIG_ERROR: i32 = 2;
    /// A requested snapshot does not exist
    pub const SNAPSHOT_NOT_FOUND: i32 = 3;
    /// Storage or output I/O failed
    pub const IO_ERROR: i32 = 4;
}
