//! Default values and the built-in capture list.

use super::types::{CaptureConfig, CommandGroup};

/// Default per-command timeout in seconds.
pub const DEFAULT_COMMAND_TIMEOUT_SECS: u64 = 30;

/// Default snapshot tag.
pub const DEFAULT_TAG: &str = "syscap";

/// Directory name under the home directory used as the default storage root.
pub const DEFAULT_STORAGE_DIR_NAME: &str = ".syscap";

impl CaptureConfig {
    /// The capture list used when no config file is found.
    ///
    /// Directory listing, network and storage state, plus a handful of
    /// commonly edited files under `/etc`.
    #[must_use]
    pub fn builtin() -> Self {
        Self::builder()
            .command_group(CommandGroup::new("ls", ["/usr/bin/ls -la"]).requiring("/usr/bin/ls"))
            .command_group(CommandGroup::new(
                "network",
                ["/sbin/ip -4 a s", "/sbin/ip route show"],
            ))
            .command_group(CommandGroup::new(
                "storage",
                ["/usr/bin/df -TP", "/usr/bin/lsblk"],
            ))
            .file("/etc/hosts")
            .file("/etc/hostname")
            .file("/etc/wgetrc")
            .file("/etc/rsyncd.conf")
            .build()
    }
}
