//! Bootstrap orchestrator.
//!
//! Drives "helper already up? → enable transport → discover endpoint →
//! connect → start helper" under one deadline and one cancellation token.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{sleep, timeout_at, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, info_span, warn, Instrument};

use hb_core::config::BootstrapConfig;
use hb_core::ports::{
    DiscoveryPort, HelperProbePort, Notice, NotifierPort, TransportError, TransportPort,
    WirelessDebugPort,
};
use hb_core::{BootstrapOutcome, DiscoveryResult, RunId, TransportErrorKind};

use super::run_handle::RunHandle;
use super::subscription::DiscoverySubscription;

/// Early exit of a bootstrap step with its terminal outcome.
type Step<T> = Result<T, BootstrapOutcome>;

#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("bootstrap run {0} already in flight")]
    Busy(RunId),
}

/// What to do when a run is requested while another is still in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConcurrentRunPolicy {
    /// Attach to the in-flight run and share its outcome.
    #[default]
    Join,
    Reject,
}

/// Ports used by the orchestrator.
#[derive(Clone)]
pub struct BootstrapDeps {
    pub probe: Arc<dyn HelperProbePort>,
    pub wireless: Arc<dyn WirelessDebugPort>,
    pub discovery: Arc<dyn DiscoveryPort>,
    pub transport: Arc<dyn TransportPort>,
    pub notifier: Arc<dyn NotifierPort>,
}

#[derive(Debug, Clone)]
pub struct BootstrapSettings {
    /// Host the discovered port belongs to.
    pub host: String,
    pub fallback_port: u16,
    pub poll_interval: Duration,
    pub service_type: String,
    pub start_command: String,
}

impl From<&BootstrapConfig> for BootstrapSettings {
    fn from(config: &BootstrapConfig) -> Self {
        Self {
            host: config.host.clone(),
            fallback_port: config.fallback_port,
            poll_interval: config.poll_interval(),
            service_type: config.service_type.clone(),
            start_command: config.start_command.clone(),
        }
    }
}

/// Starts the helper through the debug transport.
///
/// At most one run is in flight per orchestrator; see
/// [`ConcurrentRunPolicy`]. Dropping the orchestrator, or calling
/// [`BootstrapOrchestrator::shutdown`], cancels every run it owns.
pub struct BootstrapOrchestrator {
    runner: Arc<BootstrapRunner>,
    in_flight: Mutex<Option<RunHandle>>,
    lifetime: CancellationToken,
}

impl BootstrapOrchestrator {
    pub fn new(deps: BootstrapDeps, settings: BootstrapSettings) -> Self {
        Self {
            runner: Arc::new(BootstrapRunner { deps, settings }),
            in_flight: Mutex::new(None),
            lifetime: CancellationToken::new(),
        }
    }

    /// Run to completion within `budget`.
    pub async fn run(&self, budget: Duration) -> BootstrapOutcome {
        self.start(budget).outcome().await
    }

    /// Start a run, or join the one already in flight.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&self, budget: Duration) -> RunHandle {
        let mut slot = self.lock_in_flight();
        if let Some(handle) = Self::active(&slot) {
            debug!(run_id = %handle.id(), "joining in-flight bootstrap run");
            return handle;
        }
        self.spawn_run(&mut slot, budget)
    }

    /// Start a run, applying `policy` if one is already in flight.
    pub fn try_start(
        &self,
        budget: Duration,
        policy: ConcurrentRunPolicy,
    ) -> Result<RunHandle, BootstrapError> {
        let mut slot = self.lock_in_flight();
        if let Some(handle) = Self::active(&slot) {
            return match policy {
                ConcurrentRunPolicy::Join => {
                    debug!(run_id = %handle.id(), "joining in-flight bootstrap run");
                    Ok(handle)
                }
                ConcurrentRunPolicy::Reject => {
                    warn!(run_id = %handle.id(), "bootstrap run rejected, another run in flight");
                    Err(BootstrapError::Busy(handle.id().clone()))
                }
            };
        }
        Ok(self.spawn_run(&mut slot, budget))
    }

    /// Handle of the run in flight, if any.
    pub fn current(&self) -> Option<RunHandle> {
        Self::active(&self.lock_in_flight())
    }

    /// Cancel all runs. Runs started afterwards are cancelled immediately.
    pub fn shutdown(&self) {
        self.lifetime.cancel();
    }

    fn active(slot: &Option<RunHandle>) -> Option<RunHandle> {
        slot.as_ref()
            .filter(|handle| !handle.is_finished())
            .cloned()
    }

    fn lock_in_flight(&self) -> MutexGuard<'_, Option<RunHandle>> {
        self.in_flight.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn spawn_run(&self, slot: &mut Option<RunHandle>, budget: Duration) -> RunHandle {
        let id = RunId::new();
        let cancel = self.lifetime.child_token();
        let (tx, rx) = watch::channel(None);
        let handle = RunHandle::new(id.clone(), rx, cancel.clone());

        let runner = Arc::clone(&self.runner);
        let span = info_span!(
            "usecase.bootstrap.run",
            run_id = %id,
            budget_ms = budget.as_millis() as u64
        );
        tokio::spawn(
            async move {
                let outcome = runner.run(budget, cancel).await;
                info!(%outcome, "bootstrap run finished");
                let _ = tx.send(Some(outcome));
            }
            .instrument(span),
        );

        *slot = Some(handle.clone());
        handle
    }
}

impl Drop for BootstrapOrchestrator {
    fn drop(&mut self) {
        self.lifetime.cancel();
    }
}

struct BootstrapRunner {
    deps: BootstrapDeps,
    settings: BootstrapSettings,
}

impl BootstrapRunner {
    /// One run: the whole sequence races the deadline and the token.
    ///
    /// Losing the race drops the sequence future, which stops the poll,
    /// releases the discovery subscription and abandons any connection
    /// attempt in progress.
    async fn run(&self, budget: Duration, cancel: CancellationToken) -> BootstrapOutcome {
        // A budget past the clock's range means no deadline at all.
        let Some(deadline) = Instant::now().checked_add(budget) else {
            debug!("budget exceeds the clock range, running without deadline");
            return tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    info!("bootstrap run cancelled");
                    BootstrapOutcome::Cancelled
                }
                outcome = self.drive() => outcome,
            };
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                info!("bootstrap run cancelled");
                BootstrapOutcome::Cancelled
            }
            result = timeout_at(deadline, self.drive()) => match result {
                Ok(outcome) => outcome,
                Err(_) => {
                    warn!(
                        budget_ms = budget.as_millis() as u64,
                        "timeout waiting for helper bootstrap"
                    );
                    BootstrapOutcome::TimedOut
                }
            },
        }
    }

    async fn drive(&self) -> BootstrapOutcome {
        if self.deps.probe.ping().await.is_reachable() {
            info!("helper is already running");
            return BootstrapOutcome::AlreadyRunning;
        }

        let endpoint = match self.prepare().await {
            Ok(endpoint) => endpoint,
            Err(outcome) => return outcome,
        };

        self.start_helper(&endpoint).await
    }

    async fn prepare(&self) -> Step<DiscoveryResult> {
        self.ensure_transport_enabled().await?;
        self.resolve_endpoint().await
    }

    async fn ensure_transport_enabled(&self) -> Step<()> {
        if self.transport_enabled().await {
            debug!("wireless debugging already enabled");
            return Ok(());
        }

        info!("wireless debugging disabled, requesting enablement");
        self.deps.wireless.request_enable().await.map_err(|err| {
            error!(error = %err, "failed to enable wireless debugging");
            BootstrapOutcome::TransportError(TransportErrorKind::Other)
        })?;

        while !self.transport_enabled().await {
            sleep(self.settings.poll_interval).await;
        }
        info!("wireless debugging enabled");
        Ok(())
    }

    async fn transport_enabled(&self) -> bool {
        match self.deps.wireless.is_enabled().await {
            Ok(enabled) => enabled,
            Err(err) => {
                warn!(error = %err, "failed to read wireless debugging state");
                false
            }
        }
    }

    async fn resolve_endpoint(&self) -> Step<DiscoveryResult> {
        let host = self.settings.host.as_str();

        if !self.deps.discovery.supports_discovery().await {
            info!(
                port = self.settings.fallback_port,
                "discovery unsupported, using fallback port"
            );
            return Ok(DiscoveryResult::new(host, self.settings.fallback_port));
        }

        let mut subscription = DiscoverySubscription::open(
            Arc::clone(&self.deps.discovery),
            &self.settings.service_type,
        )
        .await
        .map_err(|err| {
            error!(error = %err, "failed to start discovery");
            BootstrapOutcome::TransportError(TransportErrorKind::Other)
        })?;

        let endpoint = subscription.first_valid(host).await;
        subscription.close();

        endpoint.ok_or_else(|| {
            warn!("discovery ended without a usable port");
            BootstrapOutcome::TransportError(TransportErrorKind::Other)
        })
    }

    async fn start_helper(&self, endpoint: &DiscoveryResult) -> BootstrapOutcome {
        info!(%endpoint, "starting helper over debug transport");
        self.deps.notifier.notify(Notice::StartingHelper).await;

        match self.connect_and_start(endpoint).await {
            Ok(output) => {
                debug!(%endpoint, output = %output.trim(), "helper start command completed");
                BootstrapOutcome::Started
            }
            Err(err) => {
                let kind = err.kind();
                error!(%endpoint, %kind, error = %err, "helper start failed");
                self.deps
                    .notifier
                    .notify(Notice::HelperStartFailed {
                        kind,
                        endpoint: endpoint.to_string(),
                        message: err.to_string(),
                    })
                    .await;
                BootstrapOutcome::TransportError(kind)
            }
        }
    }

    async fn connect_and_start(
        &self,
        endpoint: &DiscoveryResult,
    ) -> Result<String, TransportError> {
        let mut session = self
            .deps
            .transport
            .connect(&endpoint.host, endpoint.port)
            .await?;
        session.authenticate().await?;
        session.send_command(&self.settings.start_command).await
    }
}
