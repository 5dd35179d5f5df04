//! Permission grant and boot-mode use cases.

mod reconciler;
mod toggle;

use std::sync::Arc;
use std::time::Duration;

use hb_core::config::AppConfig;
use hb_core::ports::{
    ComponentToggleError, ComponentTogglePort, ConfigStorePort, HelperProbePort, NotifierPort,
    PermissionGatewayPort, PermissionStatePort,
};
use hb_core::{BootFlags, GrantTarget};

pub use reconciler::{PermissionReconciler, ReconcileReport};
pub use toggle::{BootModeToggle, ToggleError};

/// Ports used by the permission use cases.
#[derive(Clone)]
pub struct PermissionDeps {
    pub store: Arc<dyn ConfigStorePort>,
    pub components: Arc<dyn ComponentTogglePort>,
    pub permission_state: Arc<dyn PermissionStatePort>,
    pub gateway: Arc<dyn PermissionGatewayPort>,
    pub probe: Arc<dyn HelperProbePort>,
    pub notifier: Arc<dyn NotifierPort>,
}

#[derive(Debug, Clone)]
pub struct PermissionSettings {
    pub target: GrantTarget,
    /// Boot-trigger component, `package/class`.
    pub boot_component: String,
    /// Debug tool named in the manual grant command.
    pub debug_tool: String,
    pub settle_delay: Duration,
}

impl From<&AppConfig> for PermissionSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            target: config.grant.target(),
            boot_component: config.grant.boot_component.clone(),
            debug_tool: config.tools.debug_tool.clone(),
            settle_delay: config.grant.settle_delay(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    #[error("config store failed: {0:#}")]
    Store(anyhow::Error),

    #[error(transparent)]
    Component(#[from] ComponentToggleError),

    #[error("permission state unavailable: {0:#}")]
    PermissionState(anyhow::Error),
}

/// Persist `after`, writing cleared flags before set ones so the store
/// never holds both boot flags at once.
async fn write_flags(
    store: &dyn ConfigStorePort,
    before: BootFlags,
    after: BootFlags,
) -> anyhow::Result<()> {
    let mut changed = before.changed_targets(&after);
    changed.sort_by_key(|target| after.get(*target));
    for target in changed {
        store.set_bool(target.key(), after.get(target)).await?;
    }
    Ok(())
}
