use async_trait::async_trait;
use tracing::{debug, info};

use hb_core::ports::{WirelessDebugError, WirelessDebugPort};

use crate::command::{CommandOutput, ShellEntry};

const SETTING: &str = "adb_wifi_enabled";

/// Wireless debugging switch backed by the global `adb_wifi_enabled`
/// setting.
///
/// Writing the setting needs `WRITE_SECURE_SETTINGS` on the shell that
/// runs it.
pub struct SettingsWirelessDebug {
    shell: ShellEntry,
}

impl SettingsWirelessDebug {
    pub fn new(shell: ShellEntry) -> Self {
        Self { shell }
    }
}

#[async_trait]
impl WirelessDebugPort for SettingsWirelessDebug {
    async fn is_enabled(&self) -> Result<bool, WirelessDebugError> {
        let output = self
            .shell
            .exec(&format!("settings get global {SETTING}"))
            .await
            .map_err(|e| WirelessDebugError::Platform(format!("{e:#}")))?;
        check(&output)?;

        let enabled = parse_setting(&output.stdout);
        debug!(enabled, "wireless debugging state read");
        Ok(enabled)
    }

    async fn request_enable(&self) -> Result<(), WirelessDebugError> {
        let output = self
            .shell
            .exec(&format!("settings put global {SETTING} 1"))
            .await
            .map_err(|e| WirelessDebugError::Platform(format!("{e:#}")))?;
        check(&output)?;
        info!("wireless debugging enable requested");
        Ok(())
    }
}

/// `settings get` prints `1`, `0` or `null`.
fn parse_setting(stdout: &str) -> bool {
    stdout.trim() == "1"
}

fn check(output: &CommandOutput) -> Result<(), WirelessDebugError> {
    let text = output.combined();
    if is_denial(&text) {
        return Err(WirelessDebugError::PermissionDenied(text));
    }
    if text.contains("Wi-Fi") || text.contains("not connected") {
        return Err(WirelessDebugError::Validation(text));
    }
    if !output.success() {
        return Err(WirelessDebugError::Platform(text));
    }
    Ok(())
}

pub(crate) fn is_denial(text: &str) -> bool {
    text.contains("SecurityException")
        || text.contains("Permission denial")
        || text.contains("not allowed")
}
