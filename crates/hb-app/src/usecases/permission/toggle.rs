use std::sync::Arc;

use tracing::{info, info_span, warn, Instrument};

use hb_core::ports::{load_boot_flags, ComponentToggleError, Notice};
use hb_core::{BootMode, BootTarget, StatePolicy};

use super::{write_flags, PermissionReconciler, ReconcileError};

#[derive(Debug, thiserror::Error)]
pub enum ToggleError {
    /// Wireless boot needs the secure-settings permission first.
    #[error("permission {0} is required for wireless boot")]
    PermissionRequired(String),

    #[error("config store failed: {0:#}")]
    Store(anyhow::Error),

    #[error("permission state unavailable: {0:#}")]
    PermissionState(anyhow::Error),

    #[error(transparent)]
    Component(#[from] ComponentToggleError),

    /// The component change was accepted but reads back differently.
    #[error("boot component state did not apply (expected enabled={expected})")]
    ComponentNotApplied { expected: bool },
}

impl From<ReconcileError> for ToggleError {
    fn from(err: ReconcileError) -> Self {
        match err {
            ReconcileError::Store(err) => Self::Store(err),
            ReconcileError::Component(err) => Self::Component(err),
            ReconcileError::PermissionState(err) => Self::PermissionState(err),
        }
    }
}

/// Switches local or wireless boot on and off, keeping the two modes
/// mutually exclusive and the boot component in line with the flags.
pub struct BootModeToggle {
    reconciler: Arc<PermissionReconciler>,
}

impl BootModeToggle {
    pub fn new(reconciler: Arc<PermissionReconciler>) -> Self {
        Self { reconciler }
    }

    /// Apply a user toggle and return the resulting effective mode.
    ///
    /// Flags are persisted before the component is touched; a component
    /// failure is reported but leaves the new flags in place.
    pub async fn set_mode(
        &self,
        target: BootTarget,
        turning_on: bool,
    ) -> Result<BootMode, ToggleError> {
        let span = info_span!("usecase.boot_mode.set", ?target, turning_on);
        self.set_mode_inner(target, turning_on).instrument(span).await
    }

    async fn set_mode_inner(
        &self,
        target: BootTarget,
        turning_on: bool,
    ) -> Result<BootMode, ToggleError> {
        if target == BootTarget::Wireless && turning_on {
            self.require_permission().await?;
        }

        let store = self.reconciler.deps.store.as_ref();
        let before = load_boot_flags(store).await.map_err(ToggleError::Store)?;
        let after =
            StatePolicy::on_mode_toggled(target, turning_on).apply(before, target, turning_on);
        write_flags(store, before, after)
            .await
            .map_err(ToggleError::Store)?;
        info!(before = ?before, after = ?after, "boot flags updated");

        let component = StatePolicy::component_required(after);
        if let Err(err) = self.apply_component(component).await {
            warn!(error = %err, component, "boot component change failed");
            self.reconciler
                .deps
                .notifier
                .notify(Notice::ComponentToggleFailed)
                .await;
            return Err(err);
        }

        let permission = self.reconciler.permission_granted().await?;
        let mode = StatePolicy::resolve_flags(after, component, permission);
        info!(?mode, "boot mode applied");
        Ok(mode)
    }

    /// Ok when the permission is present or a pending grant completes now.
    async fn require_permission(&self) -> Result<(), ToggleError> {
        if self.reconciler.permission_granted().await? {
            return Ok(());
        }
        let result = self.reconciler.attempt_automatic_grant().await;
        if result.is_granted() {
            return Ok(());
        }
        info!(?result, "wireless boot refused, permission missing");
        Err(ToggleError::PermissionRequired(
            self.reconciler.settings.target.permission.clone(),
        ))
    }

    async fn apply_component(&self, enabled: bool) -> Result<(), ToggleError> {
        let components = &self.reconciler.deps.components;
        let component = &self.reconciler.settings.boot_component;

        components.set_enabled(component, enabled).await?;
        if components.is_enabled(component).await? != enabled {
            return Err(ToggleError::ComponentNotApplied { expected: enabled });
        }
        Ok(())
    }
}
