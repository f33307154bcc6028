//! Configuration schema definitions.
//!
//! Every section is defaulted so the tool runs on a stock HestiaCP host
//! without any config file at all.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for the diagnostic tool.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct DebugConfig {
    /// Where the panel lives and how to query it.
    pub panel: PanelConfig,

    /// External address lookup used by the standalone mode.
    pub lookup: LookupConfig,

    /// Embedded web server for the interactive mode.
    pub server: ServerConfig,

    /// Logging settings.
    pub observability: ObservabilityConfig,
}

/// Panel installation layout.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PanelConfig {
    /// Shared helper module that carries the panel's IP detection.
    /// Its presence marks a real panel install.
    pub helpers_path: PathBuf,

    /// Directory holding the panel's `v-*` command scripts.
    pub bin_dir: PathBuf,

    /// Run the configuration dump through sudo.
    pub use_sudo: bool,

    /// sudo binary (looked up on PATH when not absolute).
    pub sudo_path: String,

    /// Deadline for the configuration dump command in seconds.
    pub command_timeout_secs: u64,
}

impl PanelConfig {
    /// Configuration dump command (`v-list-sys-config`).
    pub fn list_command(&self) -> PathBuf {
        self.bin_dir.join("v-list-sys-config")
    }

    /// Configuration change command (`v-change-sys-config-value`),
    /// only ever printed in remediation hints.
    pub fn change_command(&self) -> PathBuf {
        self.bin_dir.join("v-change-sys-config-value")
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs)
    }

    pub fn helpers_path(&self) -> &Path {
        &self.helpers_path
    }
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            helpers_path: PathBuf::from("/usr/local/hestia/web/inc/helpers.php"),
            bin_dir: PathBuf::from("/usr/local/hestia/bin"),
            use_sudo: true,
            sudo_path: "sudo".to_string(),
            command_timeout_secs: 30,
        }
    }
}

/// External address lookup configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LookupConfig {
    /// Query the echo service at all; when off the fallback is used.
    pub enabled: bool,

    /// Plain-text IP echo endpoint.
    pub url: String,

    /// Per-family request timeout in seconds.
    pub timeout_secs: u64,

    /// Connection address used when both lookups fail.
    pub fallback_address: String,
}

impl LookupConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            url: "https://ifconfig.me/ip".to_string(),
            timeout_secs: 5,
            fallback_address: "127.0.0.1".to_string(),
        }
    }
}

/// Web server configuration for `serve`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1:8090").
    pub bind_address: String,

    /// Whole-request deadline in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8090".to_string(),
            request_timeout_secs: 60,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Human-readable or JSON log lines.
    pub log_format: LogFormat,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}
