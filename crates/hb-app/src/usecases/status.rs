//! Read-only boot status snapshot.

use std::sync::Arc;

use serde::Serialize;
use tracing::warn;

use hb_core::ports::{load_boot_flags, WirelessDebugPort};
use hb_core::{BootFlags, BootMode, HelperReachability, StatePolicy};

use super::permission::{PermissionReconciler, ReconcileError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BootStatusView {
    pub mode: BootMode,
    pub flags: BootFlags,
    pub helper: HelperReachability,
    pub pending_grant: bool,
    pub permission_granted: bool,
    pub component_enabled: bool,
    /// `None` when the setting could not be read.
    pub wireless_debug_enabled: Option<bool>,
}

/// Collects the current state without changing any of it.
pub struct BootStatus {
    reconciler: Arc<PermissionReconciler>,
    wireless: Arc<dyn WirelessDebugPort>,
}

impl BootStatus {
    pub fn new(
        reconciler: Arc<PermissionReconciler>,
        wireless: Arc<dyn WirelessDebugPort>,
    ) -> Self {
        Self { reconciler, wireless }
    }

    pub async fn snapshot(&self) -> Result<BootStatusView, ReconcileError> {
        let deps = &self.reconciler.deps;

        let flags = load_boot_flags(deps.store.as_ref())
            .await
            .map_err(ReconcileError::Store)?;
        let pending_grant = self.reconciler.pending().await?;
        let permission_granted = self.reconciler.permission_granted().await?;
        let component_enabled = deps
            .components
            .is_enabled(&self.reconciler.settings.boot_component)
            .await?;
        let helper = deps.probe.ping().await;
        let wireless_debug_enabled = match self.wireless.is_enabled().await {
            Ok(enabled) => Some(enabled),
            Err(err) => {
                warn!(error = %err, "failed to read wireless debugging state");
                None
            }
        };

        Ok(BootStatusView {
            mode: StatePolicy::resolve_flags(flags, component_enabled, permission_granted),
            flags,
            helper,
            pending_grant,
            permission_granted,
            component_enabled,
            wireless_debug_enabled,
        })
    }
}
