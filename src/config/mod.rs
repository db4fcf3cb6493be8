//! Configuration module for syscap.
//!
//! This module provides:
//! - The capture list ([`CaptureConfig`]) with a built-in default
//! - Validation for all configuration values
//! - YAML/JSON config file loading and discovery
//! - Per-invocation settings assembled from CLI flags
//!
//! # Configuration File
//!
//! Place a `.syscap.yaml` file in the working directory or `~/.config/syscap/`:
//!
//! ```yaml
//! command_timeout_secs: 10
//! commands:
//!   - name: kernel
//!     exec: [uname -a]
//! files:
//!   - /etc/hosts
//! ```

mod defaults;
pub mod file;
mod types;
mod validation;

pub use defaults::{DEFAULT_COMMAND_TIMEOUT_SECS, DEFAULT_STORAGE_DIR_NAME, DEFAULT_TAG};
pub use types::{
    CaptureCommandConfig, CaptureConfig, CaptureConfigBuilder, CommandGroup, DiffCommandConfig,
    OutputConfig,
};
pub use validation::{ConfigError, Validatable};

pub use file::{
    default_storage_root, discover_config_file, generate_full_example_config, init_config_file,
    load_config_file, load_or_builtin, resolve_storage_root, ConfigFileError, CONFIG_FILE_NAMES,
};

/// Generate a JSON Schema for the capture list format.
///
/// Editors can use it to validate `.syscap.yaml` and `capture.json` files.
pub fn generate_json_schema() -> crate::error::Result<String> {
    let schema = schemars::schema_for!(CaptureConfig);
    serde_json::to_string_pretty(&schema)
        .map_err(|e| crate::error::SyscapError::Report(format!("schema serialization: {e}")))
}
