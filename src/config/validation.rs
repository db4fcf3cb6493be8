//! Configuration validation for syscap.

use super::types::{CaptureConfig, CommandGroup};
use crate::storage::{encoded_len, fits_file_name, MAX_FILE_NAME_LEN};
use std::collections::HashSet;

// ============================================================================
// Configuration Error
// ============================================================================

/// Error type for configuration validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    /// The field that failed validation
    pub field: String,
    /// Description of the validation error
    pub message: String,
}

impl ConfigError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Validation Trait
// ============================================================================

/// Trait for validatable configuration types.
pub trait Validatable {
    /// Validate the configuration, returning any errors found.
    fn validate(&self) -> Vec<ConfigError>;

    /// Check if the configuration is valid.
    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

// ============================================================================
// Validation Implementations
// ============================================================================

impl Validatable for CaptureConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.command_timeout_secs == 0 {
            errors.push(ConfigError::new(
                "command_timeout_secs",
                "Timeout must be at least 1 second",
            ));
        }

        for (i, group) in self.commands.iter().enumerate() {
            errors.extend(group.validate().into_iter().map(|e| ConfigError {
                field: format!("commands[{i}].{}", e.field),
                message: e.message,
            }));
        }

        for (i, path) in self.files.iter().enumerate() {
            if path.as_os_str().is_empty() {
                errors.push(ConfigError::new(
                    format!("files[{i}]"),
                    "File path must not be empty",
                ));
            }
        }

        // Item names share one namespace across commands and files.
        let mut seen = HashSet::new();
        let names = self
            .commands
            .iter()
            .map(|g| g.name.clone())
            .chain(self.files.iter().map(|p| p.display().to_string()));
        for name in names {
            if !fits_file_name(&name) {
                errors.push(ConfigError::new(
                    "items",
                    format!(
                        "Item name '{name}' encodes to {} bytes, over the {MAX_FILE_NAME_LEN}-byte file name limit",
                        encoded_len(&name)
                    ),
                ));
            }
            if !name.is_empty() && !seen.insert(name.clone()) {
                errors.push(ConfigError::new(
                    "items",
                    format!("Duplicate item name '{name}'"),
                ));
            }
        }

        errors
    }
}

impl Validatable for CommandGroup {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if self.name.trim().is_empty() {
            errors.push(ConfigError::new("name", "Group name must not be empty"));
        }
        if self.exec.is_empty() {
            errors.push(ConfigError::new(
                "exec",
                format!("Group '{}' has no commands", self.name),
            ));
        }
        for (j, cmd) in self.exec.iter().enumerate() {
            if cmd.trim().is_empty() {
                errors.push(ConfigError::new(
                    format!("exec[{j}]"),
                    "Command must not be empty",
                ));
            }
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_empty_config_is_valid() {
        assert!(CaptureConfig::default().is_valid());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = CaptureConfig::builder().command_timeout_secs(0).build();
        let errors = config.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "command_timeout_secs");
    }

    #[test]
    fn test_group_errors_are_prefixed() {
        let config = CaptureConfig::builder()
            .command_group(CommandGroup::new("", Vec::<String>::new()))
            .build();
        let fields: Vec<_> = config.validate().into_iter().map(|e| e.field).collect();
        assert!(fields.contains(&"commands[0].name".to_string()));
        assert!(fields.contains(&"commands[0].exec".to_string()));
    }

    #[test]
    fn test_blank_command_rejected() {
        let group = CommandGroup::new("x", ["uname", "   "]);
        let errors = group.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "exec[1]");
    }

    #[test]
    fn test_item_names_too_long_to_store_rejected() {
        let long_path = format!("/{}f", "ab/".repeat(70));
        let config = CaptureConfig::builder()
            .file("/etc/motd")
            .file(PathBuf::from(&long_path))
            .command("x".repeat(300), "true")
            .build();
        let errors = config.validate();
        assert_eq!(errors.len(), 2, "{errors:?}");
        assert!(errors.iter().all(|e| e.field == "items"));
        assert!(errors[0].message.contains("300 bytes"));
        assert!(errors[1].message.contains("354 bytes"));
    }

    #[test]
    fn test_duplicate_names_across_kinds() {
        let config = CaptureConfig::builder()
            .command("/etc/hosts", "cat /etc/hosts")
            .file("/etc/hosts")
            .file(PathBuf::from("/etc/motd"))
            .file(PathBuf::from("/etc/motd"))
            .build();
        let dupes: Vec<_> = config
            .validate()
            .into_iter()
            .filter(|e| e.field == "items")
            .collect();
        assert_eq!(dupes.len(), 2);
        assert!(dupes[0].message.contains("/etc/hosts"));
        assert!(dupes[1].message.contains("/etc/motd"));
    }
}
