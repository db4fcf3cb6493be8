//! Configuration file loading and discovery.
//!
//! Capture lists are read from YAML, or from JSON when the file name ends in
//! `.json` (the legacy `capture.json` layout).

use super::defaults::DEFAULT_STORAGE_DIR_NAME;
use super::types::CaptureConfig;
use super::validation::{ConfigError, Validatable};
use crate::error::{Result, SyscapError};
use std::path::{Path, PathBuf};

// ============================================================================
// Configuration File Discovery
// ============================================================================

/// Standard config file names to search for.
pub const CONFIG_FILE_NAMES: &[&str] = &[
    ".syscap.yaml",
    ".syscap.yml",
    "syscap.yaml",
    "syscap.yml",
    "capture.json",
];

/// Directories searched for a config file, in order.
///
/// 1. Current directory
/// 2. User config directory (`~/.config/syscap/`)
/// 3. Home directory
#[must_use]
pub fn config_search_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd);
    }
    if let Some(config_dir) = dirs::config_dir() {
        dirs.push(config_dir.join("syscap"));
    }
    if let Some(home) = dirs::home_dir() {
        dirs.push(home);
    }
    dirs
}

/// Discover a config file by searching standard locations.
///
/// An explicit path is returned as-is, whether or not it exists, so that a
/// mistyped `--config` surfaces as an error instead of silently falling back.
#[must_use]
pub fn discover_config_file(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return Some(path.to_path_buf());
    }

    config_search_dirs()
        .iter()
        .find_map(|dir| find_config_in_dir(dir))
}

/// Find a config file in a specific directory.
fn find_config_in_dir(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}

// ============================================================================
// Configuration File Loading
// ============================================================================

/// Error type for config file operations.
#[derive(Debug)]
pub enum ConfigFileError {
    /// File not found
    NotFound(PathBuf),
    /// IO error reading file
    Io(std::io::Error),
    /// YAML parsing error
    Yaml(serde_yaml::Error),
    /// JSON parsing error
    Json(serde_json::Error),
    /// Parsed but failed validation
    Invalid(Vec<ConfigError>),
}

impl std::fmt::Display for ConfigFileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(path) => {
                write!(f, "Config file not found: {}", path.display())
            }
            Self::Io(e) => write!(f, "Failed to read config file: {e}"),
            Self::Yaml(e) => write!(f, "Failed to parse YAML: {e}"),
            Self::Json(e) => write!(f, "Failed to parse JSON (line {}): {e}", e.line()),
            Self::Invalid(errors) => {
                let joined: Vec<String> = errors.iter().map(ToString::to_string).collect();
                write!(f, "Invalid capture list: {}", joined.join("; "))
            }
        }
    }
}

impl std::error::Error for ConfigFileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::NotFound(_) | Self::Invalid(_) => None,
            Self::Io(e) => Some(e),
            Self::Yaml(e) => Some(e),
            Self::Json(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for ConfigFileError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_yaml::Error> for ConfigFileError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Yaml(err)
    }
}

impl From<serde_json::Error> for ConfigFileError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

/// Load and validate a `CaptureConfig` from a YAML or JSON file.
pub fn load_config_file(path: &Path) -> std::result::Result<CaptureConfig, ConfigFileError> {
    if !path.exists() {
        return Err(ConfigFileError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;
    let config: CaptureConfig = if is_json(path) {
        serde_json::from_str(&content)?
    } else {
        serde_yaml::from_str(&content)?
    };

    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigFileError::Invalid(errors));
    }
    Ok(config)
}

/// Load the config from an explicit or discovered file, or fall back to
/// [`CaptureConfig::builtin`] when no file exists anywhere.
///
/// A file that exists but cannot be read or parsed is a configuration error.
pub fn load_or_builtin(explicit_path: Option<&Path>) -> Result<(CaptureConfig, Option<PathBuf>)> {
    let Some(path) = discover_config_file(explicit_path) else {
        tracing::debug!("No config file found; using built-in capture list");
        return Ok((CaptureConfig::builtin(), None));
    };

    tracing::debug!("Using config file {}", path.display());
    let config = load_config_file(&path).map_err(|source| SyscapError::ConfigFile {
        path: path.clone(),
        source,
    })?;
    Ok((config, Some(path)))
}

// ============================================================================
// Storage root resolution
// ============================================================================

/// Default storage root: `~/.syscap`, or `./.syscap` without a home directory.
#[must_use]
pub fn default_storage_root() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_STORAGE_DIR_NAME)
}

/// Pick the storage root: CLI/env override, then config file, then default.
#[must_use]
pub fn resolve_storage_root(cli_override: Option<PathBuf>, config: &CaptureConfig) -> PathBuf {
    cli_override
        .or_else(|| config.storage_root.clone())
        .unwrap_or_else(default_storage_root)
}

// ============================================================================
// Example Config Generation
// ============================================================================

/// Generate the commented default config written by `--init`.
#[must_use]
pub fn generate_full_example_config() -> String {
    r"# syscap capture list
# ====================
#
# Searched for as .syscap.yaml, syscap.yaml or capture.json in the current
# directory, ~/.config/syscap/ and the home directory. Pass --config to use
# another file.

# Snapshot storage (default ~/.syscap; SYSCAP_STORAGE_ROOT and
# --storage-root take precedence)
# storage_root: /var/lib/syscap

# Seconds before a running command is killed and recorded as timed out
command_timeout_secs: 30

# Each group becomes one captured item named after the group. Commands run
# through /bin/sh with the base directory as working directory.
commands:
  - name: ls
    require: /usr/bin/ls
    exec:
      - /usr/bin/ls -la
  - name: network
    exec:
      - /sbin/ip -4 a s
      - /sbin/ip route show
  - name: storage
    exec:
      - /usr/bin/df -TP
      - /usr/bin/lsblk

# Files are read relative to the base directory (--base, default /).
files:
  - /etc/hosts
  - /etc/hostname
  - /etc/wgetrc
  - /etc/rsyncd.conf
"
    .to_string()
}

/// Write the example config to `path`, refusing to replace an existing file.
pub fn init_config_file(path: &Path) -> Result<()> {
    if path.exists() {
        return Err(SyscapError::config(format!(
            "{} already exists. Remove it first to re-initialize.",
            path.display()
        )));
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| SyscapError::io(parent, e))?;
        }
    }
    std::fs::write(path, generate_full_example_config()).map_err(|e| SyscapError::io(path, e))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_find_config_in_dir() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("syscap.yaml");
        std::fs::write(&config_path, "files:\n  - /etc/hosts\n").unwrap();

        assert_eq!(find_config_in_dir(tmp.path()), Some(config_path));
    }

    #[test]
    fn test_find_config_prefers_dotfile() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("capture.json"), "{}").unwrap();
        std::fs::write(tmp.path().join(".syscap.yaml"), "{}").unwrap();

        assert_eq!(
            find_config_in_dir(tmp.path()),
            Some(tmp.path().join(".syscap.yaml"))
        );
    }

    #[test]
    fn test_find_config_in_dir_not_found() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(find_config_in_dir(tmp.path()), None);
    }

    #[test]
    fn test_load_yaml_config() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("syscap.yaml");
        let yaml = r"
command_timeout_secs: 5
commands:
  - name: kernel
    exec: [uname -r]
files:
  - /etc/motd
";
        std::fs::write(&config_path, yaml).unwrap();

        let config = load_config_file(&config_path).unwrap();
        assert_eq!(config.command_timeout_secs, 5);
        assert_eq!(config.commands[0].name, "kernel");
        assert_eq!(config.files, vec![PathBuf::from("/etc/motd")]);
    }

    #[test]
    fn test_load_legacy_json_config() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("capture.json");
        std::fs::write(
            &config_path,
            r#"{"command_groups": [{"exec": ["df -TP"], "outfile": "storage"}], "file_list": []}"#,
        )
        .unwrap();

        let config = load_config_file(&config_path).unwrap();
        assert_eq!(config.commands[0].name, "storage");
    }

    #[test]
    fn test_load_invalid_json_reports_parse_error() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("capture.json");
        std::fs::write(&config_path, "{\n  \"file_list\": [\n").unwrap();

        let err = load_config_file(&config_path).unwrap_err();
        assert!(matches!(err, ConfigFileError::Json(_)));
        assert!(err.to_string().contains("line"));
    }

    #[test]
    fn test_load_config_rejects_invalid_list() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("syscap.yaml");
        std::fs::write(&config_path, "commands:\n  - name: x\n    exec: []\n").unwrap();

        let err = load_config_file(&config_path).unwrap_err();
        assert!(matches!(err, ConfigFileError::Invalid(_)));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config_file(Path::new("/nonexistent/syscap.yaml"));
        assert!(matches!(result, Err(ConfigFileError::NotFound(_))));
    }

    #[test]
    fn test_explicit_missing_config_is_error() {
        let err = load_or_builtin(Some(Path::new("/nonexistent/syscap.yaml"))).unwrap_err();
        assert!(matches!(err, SyscapError::ConfigFile { .. }));
    }

    #[test]
    fn test_example_config_parses_to_builtin() {
        let parsed: CaptureConfig = serde_yaml::from_str(&generate_full_example_config()).unwrap();
        assert_eq!(parsed, CaptureConfig::builtin());
    }

    #[test]
    fn test_init_refuses_overwrite() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("conf").join("syscap.yaml");

        init_config_file(&path).unwrap();
        assert!(path.is_file());

        let err = init_config_file(&path).unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }

    #[test]
    fn test_resolve_storage_root_precedence() {
        let config = CaptureConfig::builder().storage_root("/from/config").build();

        assert_eq!(
            resolve_storage_root(Some(PathBuf::from("/from/cli")), &config),
            PathBuf::from("/from/cli")
        );
        assert_eq!(
            resolve_storage_root(None, &config),
            PathBuf::from("/from/config")
        );
        assert!(resolve_storage_root(None, &CaptureConfig::default())
            .ends_with(DEFAULT_STORAGE_DIR_NAME));
    }
}
