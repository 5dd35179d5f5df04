use serde::Serialize;
use tokio::sync::Mutex;
use tokio::time::sleep;
use tracing::{debug, info, info_span, warn, Instrument};

use hb_core::grant::GrantPrompt;
use hb_core::keys;
use hb_core::ports::{load_boot_flags, GatewayError, GrantPromptPort, Notice};
use hb_core::{
    BootFlags, BootMode, FallbackOutcome, GrantError, GrantResult, StatePolicy, UserDecision,
};

use super::{write_flags, PermissionDeps, PermissionSettings, ReconcileError};

/// Result of a resume-time reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    pub mode: BootMode,
    /// Flags as persisted after the pass.
    pub flags: BootFlags,
    /// Whether any flag had to be rewritten.
    pub corrected: bool,
    /// Outcome of the pending-grant retry that precedes reconciliation.
    pub grant: GrantResult,
}

/// Owns the pending-grant flag and keeps the boot flags consistent with
/// the OS state.
///
/// Every read-modify-verify of the pending flag happens under `grant_lock`.
pub struct PermissionReconciler {
    pub(crate) deps: PermissionDeps,
    pub(crate) settings: PermissionSettings,
    grant_lock: Mutex<()>,
}

impl PermissionReconciler {
    pub fn new(deps: PermissionDeps, settings: PermissionSettings) -> Self {
        Self {
            deps,
            settings,
            grant_lock: Mutex::new(()),
        }
    }

    pub fn settings(&self) -> &PermissionSettings {
        &self.settings
    }

    /// Retry a pending grant, then rewrite the boot flags to match the
    /// component and permission state. Running it twice without an
    /// external change leaves the flags untouched the second time.
    pub async fn reconcile_on_resume(&self) -> Result<ReconcileReport, ReconcileError> {
        self.reconcile_inner()
            .instrument(info_span!("usecase.permission.reconcile_on_resume"))
            .await
    }

    async fn reconcile_inner(&self) -> Result<ReconcileReport, ReconcileError> {
        let grant = self.attempt_automatic_grant().await;

        let store = self.deps.store.as_ref();
        let flags = load_boot_flags(store)
            .await
            .map_err(ReconcileError::Store)?;
        let component = self
            .deps
            .components
            .is_enabled(&self.settings.boot_component)
            .await?;
        let permission = self.permission_granted().await?;

        let corrected = StatePolicy::reconcile(flags, component, permission);
        if corrected != flags {
            info!(
                before = ?flags,
                after = ?corrected,
                component,
                permission,
                "boot flags out of sync, correcting"
            );
            write_flags(store, flags, corrected)
                .await
                .map_err(ReconcileError::Store)?;
        }

        let mode = StatePolicy::resolve_flags(corrected, component, permission);
        debug!(?mode, ?grant, "reconciled");
        Ok(ReconcileReport {
            mode,
            flags: corrected,
            corrected: corrected != flags,
            grant,
        })
    }

    /// Try to complete a pending grant through the helper.
    ///
    /// Makes at most one gateway call and never retries. The pending flag
    /// is cleared only once the permission is observed as granted.
    pub async fn attempt_automatic_grant(&self) -> GrantResult {
        let _guard = self.grant_lock.lock().await;
        self.grant_locked()
            .instrument(info_span!("usecase.permission.attempt_grant"))
            .await
    }

    /// Resolve a missing permission through the user's choice.
    ///
    /// Exactly one path runs per decision. The manual path only returns
    /// the command; it changes no state.
    pub async fn request_with_fallback(
        &self,
        prompt: &dyn GrantPromptPort,
    ) -> Result<FallbackOutcome, ReconcileError> {
        let _guard = self.grant_lock.lock().await;

        if self.permission_granted().await? {
            return Ok(FallbackOutcome::AlreadyGranted);
        }
        if self.pending().await? {
            debug!("grant already pending, retried on next resume");
            return Ok(FallbackOutcome::AlreadyPending);
        }

        let command = self.manual_command();
        let decision = prompt
            .choose(&GrantPrompt {
                permission: self.settings.target.permission.clone(),
                manual_command: command.clone(),
            })
            .await;
        info!(?decision, "grant fallback decision");

        match decision {
            UserDecision::Cancel => Ok(FallbackOutcome::Dismissed),
            UserDecision::Manual => Ok(FallbackOutcome::Manual { command }),
            UserDecision::Automatic => {
                self.deps
                    .store
                    .set_bool(keys::GRANT_PERMISSION_PENDING, true)
                    .await
                    .map_err(ReconcileError::Store)?;

                let result = self.grant_locked().await;
                if result == GrantResult::Deferred {
                    self.deps.notifier.notify(Notice::StartHelperFirst).await;
                }
                Ok(FallbackOutcome::Automatic(result))
            }
        }
    }

    /// Drop a pending grant the user no longer wants.
    ///
    /// Returns whether a grant was pending. Later resumes stop retrying.
    pub async fn abandon_pending_grant(&self) -> Result<bool, ReconcileError> {
        let _guard = self.grant_lock.lock().await;
        if !self.pending().await? {
            return Ok(false);
        }
        self.deps
            .store
            .set_bool(keys::GRANT_PERMISSION_PENDING, false)
            .await
            .map_err(ReconcileError::Store)?;
        info!("pending grant abandoned by user");
        Ok(true)
    }

    /// `<debug-tool> shell pm grant <application-id> <permission>`
    pub fn manual_command(&self) -> String {
        self.settings.target.manual_command(&self.settings.debug_tool)
    }

    pub(crate) async fn permission_granted(&self) -> Result<bool, ReconcileError> {
        let target = &self.settings.target;
        self.deps
            .permission_state
            .is_granted(&target.application_id, &target.permission)
            .await
            .map_err(ReconcileError::PermissionState)
    }

    pub(crate) async fn pending(&self) -> Result<bool, ReconcileError> {
        self.deps
            .store
            .get_bool(keys::GRANT_PERMISSION_PENDING)
            .await
            .map_err(ReconcileError::Store)
    }

    async fn grant_locked(&self) -> GrantResult {
        match self.pending().await {
            Ok(true) => {}
            Ok(false) => return GrantResult::NotPending,
            Err(err) => return state_failure(err),
        }

        // Granted out-of-band since the flag was set.
        match self.permission_granted().await {
            Ok(true) => {
                info!("permission already present, clearing pending grant");
                return self.clear_pending().await;
            }
            Ok(false) => {}
            Err(err) => return state_failure(err),
        }

        if !self.deps.probe.ping().await.is_reachable() {
            info!("helper unreachable, grant deferred");
            return GrantResult::Deferred;
        }

        if let Err(err) = self.deps.gateway.grant(&self.settings.target).await {
            warn!(error = %err, "grant call failed");
            self.deps.notifier.notify(Notice::PermissionGrantFailed).await;
            let error = match err {
                GatewayError::PermissionDenied(message) => GrantError::PermissionDenied(message),
                other => GrantError::Gateway(other.to_string()),
            };
            return GrantResult::Failed(error);
        }

        if !self.settings.settle_delay.is_zero() {
            sleep(self.settings.settle_delay).await;
        }

        match self.permission_granted().await {
            Ok(true) => {
                let result = self.clear_pending().await;
                if result.is_granted() {
                    info!(permission = %self.settings.target.permission, "permission granted");
                    self.deps.notifier.notify(Notice::PermissionGranted).await;
                }
                result
            }
            Ok(false) => {
                warn!("grant call returned but permission is still absent");
                self.deps.notifier.notify(Notice::PermissionGrantFailed).await;
                GrantResult::Failed(GrantError::VerificationFailed)
            }
            Err(err) => state_failure(err),
        }
    }

    async fn clear_pending(&self) -> GrantResult {
        match self
            .deps
            .store
            .set_bool(keys::GRANT_PERMISSION_PENDING, false)
            .await
        {
            Ok(()) => GrantResult::Granted,
            Err(err) => state_failure(ReconcileError::Store(err)),
        }
    }
}

fn state_failure(err: ReconcileError) -> GrantResult {
    warn!(error = %err, "grant state unavailable");
    GrantResult::Failed(GrantError::State(err.to_string()))
}
