//! Calls made through the running helper's shell entry point.

use async_trait::async_trait;
use tracing::{debug, info};

use hb_core::ports::{GatewayError, HelperProbePort, PermissionGatewayPort};
use hb_core::{GrantTarget, HelperReachability};

use super::wireless_debug::is_denial;
use crate::command::ShellEntry;

/// Grants permissions with `pm grant` executed by the helper.
pub struct HelperShellGateway {
    shell: ShellEntry,
}

impl HelperShellGateway {
    pub fn new(shell: ShellEntry) -> Self {
        Self { shell }
    }
}

#[async_trait]
impl PermissionGatewayPort for HelperShellGateway {
    async fn grant(&self, target: &GrantTarget) -> Result<(), GatewayError> {
        let command = format!(
            "pm grant --user {} {} {}",
            target.user_id, target.application_id, target.permission
        );
        let output = self
            .shell
            .exec(&command)
            .await
            .map_err(|e| GatewayError::Unavailable(format!("{e:#}")))?;

        let text = output.combined();
        if is_denial(&text) {
            return Err(GatewayError::PermissionDenied(text));
        }
        if !output.success() {
            return Err(GatewayError::Failed(text));
        }
        info!(permission = %target.permission, "grant call returned");
        Ok(())
    }
}

/// Liveness probe: the helper answers if a no-op runs through it.
pub struct HelperShellProbe {
    shell: ShellEntry,
}

impl HelperShellProbe {
    pub fn new(shell: ShellEntry) -> Self {
        Self { shell }
    }
}

#[async_trait]
impl HelperProbePort for HelperShellProbe {
    async fn ping(&self) -> HelperReachability {
        match self.shell.exec("true").await {
            Ok(output) if output.success() => HelperReachability::Reachable,
            Ok(output) => {
                debug!(code = ?output.code, "helper probe failed");
                HelperReachability::Unreachable
            }
            Err(err) => {
                debug!(error = %format!("{err:#}"), "helper probe failed");
                HelperReachability::Unreachable
            }
        }
    }
}
