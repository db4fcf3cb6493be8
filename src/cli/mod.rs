//! CLI command handlers.
//!
//! This module provides testable command handlers that are invoked by main.rs.
//! Each handler implements the business logic for one mode of the binary.

mod capture;
mod diff;

pub use capture::run_capture;
pub use diff::run_diff;

// Re-export config types used by handlers
pub use crate::config::{CaptureCommandConfig, DiffCommandConfig};
