//! Application configuration domain model

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::discovery::{FALLBACK_PORT, TLS_CONNECT_SERVICE};
use crate::grant::GrantTarget;

/// Floor for poll intervals; a zero interval would spin.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Application configuration.
///
/// Every section falls back to its defaults when absent from the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub grant: GrantConfig,
    pub bootstrap: BootstrapConfig,
    pub tools: ToolsConfig,
    pub storage: StorageConfig,
}

/// Identity of this application and the permission it needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrantConfig {
    pub application_id: String,
    pub permission: String,
    /// Boot-trigger component, `package/class`.
    pub boot_component: String,
    pub user_id: u32,
    /// Wait between the gateway call and the verification read.
    pub settle_delay_ms: u64,
}

/// Bootstrap run parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BootstrapConfig {
    pub host: String,
    pub fallback_port: u16,
    pub timeout_secs: u64,
    pub poll_interval_ms: u64,
    pub service_type: String,
    /// Shell command that starts the helper once connected.
    pub start_command: String,
}

/// External tools driven by the platform adapters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    /// Debug-bridge client binary.
    pub debug_tool: String,
    /// Argv prefix that runs an unprivileged shell command on the device.
    pub device_shell: Vec<String>,
    /// Argv prefix that runs a shell command through the helper.
    pub helper_shell: Vec<String>,
    pub command_timeout_secs: u64,
    pub discovery_poll_ms: u64,
}

/// Filesystem locations. Empty paths resolve to the platform data dir.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StorageConfig {
    pub state_file: PathBuf,
    pub log_dir: PathBuf,
}

impl Default for GrantConfig {
    fn default() -> Self {
        Self {
            application_id: "io.helperboot.manager".to_string(),
            permission: "android.permission.WRITE_SECURE_SETTINGS".to_string(),
            boot_component: "io.helperboot.manager/.receiver.BootCompleteReceiver".to_string(),
            user_id: 0,
            settle_delay_ms: 200,
        }
    }
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            fallback_port: FALLBACK_PORT,
            timeout_secs: 30,
            poll_interval_ms: 1_000,
            service_type: TLS_CONNECT_SERVICE.to_string(),
            start_command: "sh /data/local/tmp/helper/start.sh".to_string(),
        }
    }
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            debug_tool: "adb".to_string(),
            device_shell: vec!["sh".to_string(), "-c".to_string()],
            helper_shell: vec!["rish".to_string(), "-c".to_string()],
            command_timeout_secs: 10,
            discovery_poll_ms: 1_000,
        }
    }
}

impl GrantConfig {
    pub fn target(&self) -> GrantTarget {
        GrantTarget {
            application_id: self.application_id.clone(),
            permission: self.permission.clone(),
            user_id: self.user_id,
        }
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

impl BootstrapConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms).max(MIN_POLL_INTERVAL)
    }
}

impl ToolsConfig {
    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs)
    }

    pub fn discovery_poll(&self) -> Duration {
        Duration::from_millis(self.discovery_poll_ms).max(MIN_POLL_INTERVAL)
    }
}
