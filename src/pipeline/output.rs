//! Output handling for diff reports.

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Target for output - either stdout or a file
#[derive(Debug, Clone)]
pub enum OutputTarget {
    /// Write to stdout
    Stdout,
    /// Write to a file
    File(PathBuf),
}

impl OutputTarget {
    /// Create output target from optional path
    pub fn from_option(path: Option<PathBuf>) -> Self {
        match path {
            Some(p) => Self::File(p),
            None => Self::Stdout,
        }
    }
}

/// Determine if color should be used based on flags, environment and target.
///
/// Files never receive ANSI escapes.
pub fn should_use_color(no_color_flag: bool, target: &OutputTarget) -> bool {
    !no_color_flag
        && std::env::var_os("NO_COLOR").is_none()
        && matches!(target, OutputTarget::Stdout)
}

/// Write output to the target (stdout or file)
pub fn write_output(content: &str, target: &OutputTarget) -> Result<()> {
    match target {
        OutputTarget::Stdout => {
            println!("{content}");
            Ok(())
        }
        OutputTarget::File(path) => {
            let mut content = content.to_string();
            content.push('\n');
            std::fs::write(path, content)
                .map_err(|e| crate::error::SyscapError::io(path, e))
                .with_context(|| format!("Failed to write output to {}", path.display()))?;
            tracing::info!("Report written to {}", path.display());
            Ok(())
        }
    }
}
