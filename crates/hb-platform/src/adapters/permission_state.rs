use anyhow::{bail, Result};
use async_trait::async_trait;

use hb_core::ports::PermissionStatePort;

use crate::command::ShellEntry;

/// Reads permission state from `dumpsys package <pkg>`.
pub struct DumpsysPermissionState {
    shell: ShellEntry,
}

impl DumpsysPermissionState {
    pub fn new(shell: ShellEntry) -> Self {
        Self { shell }
    }
}

#[async_trait]
impl PermissionStatePort for DumpsysPermissionState {
    async fn is_granted(&self, application_id: &str, permission: &str) -> Result<bool> {
        let output = self
            .shell
            .exec(&format!("dumpsys package {application_id}"))
            .await?;
        if !output.success() {
            bail!("dumpsys package {application_id} failed: {}", output.combined());
        }
        Ok(permission_granted(&output.stdout, permission))
    }
}

/// True when any `<permission>: granted=true` line is present.
fn permission_granted(dump: &str, permission: &str) -> bool {
    dump.lines().any(|line| {
        line.trim()
            .strip_prefix(permission)
            .and_then(|rest| rest.strip_prefix(':'))
            .map(|rest| rest.trim_start().starts_with("granted=true"))
            .unwrap_or(false)
    })
}
