//! Hand-written port fakes shared by the use case tests.
#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;

use hb_app::{
    BootstrapDeps, BootstrapOrchestrator, BootstrapSettings, PermissionDeps, PermissionReconciler,
    PermissionSettings,
};
use hb_core::grant::GrantPrompt;
use hb_core::ports::{
    ComponentToggleError, ComponentTogglePort, DiscoveryError, DiscoveryPort, GatewayError,
    GrantPromptPort, HelperProbePort, Notice, NotifierPort, PermissionGatewayPort,
    PermissionStatePort, TransportError, TransportPort, TransportSession, WirelessDebugError,
    WirelessDebugPort,
};
use hb_core::{GrantTarget, HelperReachability, UserDecision};
use hb_infra::InMemoryConfigStore;

pub const HOST: &str = "127.0.0.1";
pub const START_COMMAND: &str = "sh /data/local/tmp/helper/start.sh";
pub const PERMISSION: &str = "android.permission.WRITE_SECURE_SETTINGS";
pub const BOOT_COMPONENT: &str = "io.helperboot.manager/.receiver.BootCompleteReceiver";

// ---------------------------------------------------------------------------
// Helper probe
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FakeProbe {
    reachable: AtomicBool,
    pings: AtomicUsize,
}

impl FakeProbe {
    pub fn new(reachable: bool) -> Arc<Self> {
        let probe = Self::default();
        probe.reachable.store(reachable, Ordering::SeqCst);
        Arc::new(probe)
    }

    pub fn set_reachable(&self, reachable: bool) {
        self.reachable.store(reachable, Ordering::SeqCst);
    }

    pub fn pings(&self) -> usize {
        self.pings.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HelperProbePort for FakeProbe {
    async fn ping(&self) -> HelperReachability {
        self.pings.fetch_add(1, Ordering::SeqCst);
        if self.reachable.load(Ordering::SeqCst) {
            HelperReachability::Reachable
        } else {
            HelperReachability::Unreachable
        }
    }
}

// ---------------------------------------------------------------------------
// Wireless debugging switch
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FakeWireless {
    enabled: AtomicBool,
    /// `request_enable` flips the flag immediately.
    enable_on_request: AtomicBool,
    fail_request: AtomicBool,
    requests: AtomicUsize,
    reads: AtomicUsize,
}

impl FakeWireless {
    pub fn enabled() -> Arc<Self> {
        let wireless = Self::default();
        wireless.enabled.store(true, Ordering::SeqCst);
        Arc::new(wireless)
    }

    /// Disabled, and enabling takes effect on request.
    pub fn enables_on_request() -> Arc<Self> {
        let wireless = Self::default();
        wireless.enable_on_request.store(true, Ordering::SeqCst);
        Arc::new(wireless)
    }

    /// Disabled, and the flag never flips.
    pub fn stuck_disabled() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing_request() -> Arc<Self> {
        let wireless = Self::default();
        wireless.fail_request.store(true, Ordering::SeqCst);
        Arc::new(wireless)
    }

    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WirelessDebugPort for FakeWireless {
    async fn is_enabled(&self) -> Result<bool, WirelessDebugError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.enabled.load(Ordering::SeqCst))
    }

    async fn request_enable(&self) -> Result<(), WirelessDebugError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        if self.fail_request.load(Ordering::SeqCst) {
            return Err(WirelessDebugError::Validation("no wifi".into()));
        }
        if self.enable_on_request.load(Ordering::SeqCst) {
            self.enabled.store(true, Ordering::SeqCst);
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Discovery
// ---------------------------------------------------------------------------

/// Delivers scripted candidates, each after its delay, and keeps the
/// session open until `stop` is called.
pub struct FakeDiscovery {
    supported: bool,
    script: Vec<(Duration, u32)>,
    held: Mutex<Option<mpsc::Sender<u32>>>,
    support_checks: AtomicUsize,
    starts: AtomicUsize,
    stops: AtomicUsize,
    undelivered: Arc<AtomicUsize>,
}

impl FakeDiscovery {
    pub fn unsupported() -> Arc<Self> {
        Arc::new(Self::with(false, Vec::new()))
    }

    /// Candidates delivered back to back.
    pub fn yielding(ports: &[u32]) -> Arc<Self> {
        Arc::new(Self::with(
            true,
            ports.iter().map(|port| (Duration::ZERO, *port)).collect(),
        ))
    }

    pub fn scripted(script: Vec<(Duration, u32)>) -> Arc<Self> {
        Arc::new(Self::with(true, script))
    }

    /// Supported, but nothing is ever found.
    pub fn silent() -> Arc<Self> {
        Arc::new(Self::with(true, Vec::new()))
    }

    fn with(supported: bool, script: Vec<(Duration, u32)>) -> Self {
        Self {
            supported,
            script,
            held: Mutex::new(None),
            support_checks: AtomicUsize::new(0),
            starts: AtomicUsize::new(0),
            stops: AtomicUsize::new(0),
            undelivered: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn support_checks(&self) -> usize {
        self.support_checks.load(Ordering::SeqCst)
    }

    pub fn starts(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
    }

    pub fn stops(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }

    /// Candidates the session tried to deliver after it was closed.
    pub fn undelivered(&self) -> usize {
        self.undelivered.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DiscoveryPort for FakeDiscovery {
    async fn supports_discovery(&self) -> bool {
        self.support_checks.fetch_add(1, Ordering::SeqCst);
        self.supported
    }

    async fn start(
        &self,
        _service_type: &str,
        results: mpsc::Sender<u32>,
    ) -> Result<(), DiscoveryError> {
        if !self.supported {
            return Err(DiscoveryError::Unsupported);
        }
        self.starts.fetch_add(1, Ordering::SeqCst);
        *self.held.lock().unwrap() = Some(results.clone());

        let script = self.script.clone();
        let undelivered = Arc::clone(&self.undelivered);
        tokio::spawn(async move {
            for (delay, port) in script {
                tokio::time::sleep(delay).await;
                if results.send(port).await.is_err() {
                    undelivered.fetch_add(1, Ordering::SeqCst);
                }
            }
        });
        Ok(())
    }

    fn stop(&self) {
        self.stops.fetch_add(1, Ordering::SeqCst);
        self.held.lock().unwrap().take();
    }
}

// ---------------------------------------------------------------------------
// Transport
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportFailure {
    None,
    ConnectRefused,
    KeyRejected,
    CommandFailed,
}

pub struct FakeTransport {
    failure: TransportFailure,
    connect_delay: Duration,
    connects: Mutex<Vec<(String, u16)>>,
    commands: Arc<Mutex<Vec<String>>>,
}

impl FakeTransport {
    pub fn ok() -> Arc<Self> {
        Self::failing(TransportFailure::None)
    }

    pub fn failing(failure: TransportFailure) -> Arc<Self> {
        Arc::new(Self {
            failure,
            connect_delay: Duration::ZERO,
            connects: Mutex::new(Vec::new()),
            commands: Arc::new(Mutex::new(Vec::new())),
        })
    }

    pub fn slow(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            failure: TransportFailure::None,
            connect_delay: delay,
            connects: Mutex::new(Vec::new()),
            commands: Arc::new(Mutex::new(Vec::new())),
        })
    }

    pub fn connects(&self) -> Vec<(String, u16)> {
        self.connects.lock().unwrap().clone()
    }

    pub fn commands(&self) -> Vec<String> {
        self.commands.lock().unwrap().clone()
    }
}

#[async_trait]
impl TransportPort for FakeTransport {
    async fn connect(
        &self,
        host: &str,
        port: u16,
    ) -> Result<Box<dyn TransportSession>, TransportError> {
        self.connects.lock().unwrap().push((host.to_string(), port));
        if !self.connect_delay.is_zero() {
            tokio::time::sleep(self.connect_delay).await;
        }
        if self.failure == TransportFailure::ConnectRefused {
            return Err(TransportError::Connect(format!("{host}:{port} refused")));
        }
        Ok(Box::new(FakeSession {
            failure: self.failure,
            commands: Arc::clone(&self.commands),
        }))
    }
}

struct FakeSession {
    failure: TransportFailure,
    commands: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl TransportSession for FakeSession {
    async fn authenticate(&mut self) -> Result<(), TransportError> {
        if self.failure == TransportFailure::KeyRejected {
            return Err(TransportError::Key("failed to authenticate".into()));
        }
        Ok(())
    }

    async fn send_command(&mut self, command: &str) -> Result<String, TransportError> {
        self.commands.lock().unwrap().push(command.to_string());
        if self.failure == TransportFailure::CommandFailed {
            return Err(TransportError::Other("stream closed".into()));
        }
        Ok("helper started\n".to_string())
    }
}

// ---------------------------------------------------------------------------
// Notifier
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotifierPort for RecordingNotifier {
    async fn notify(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }
}

// ---------------------------------------------------------------------------
// Boot component
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FakeComponents {
    enabled: AtomicBool,
    refuse: AtomicBool,
    /// Accepts changes without applying them.
    ignore: AtomicBool,
    sets: AtomicUsize,
}

impl FakeComponents {
    pub fn new(enabled: bool) -> Arc<Self> {
        let components = Self::default();
        components.enabled.store(enabled, Ordering::SeqCst);
        Arc::new(components)
    }

    pub fn ignoring(enabled: bool) -> Arc<Self> {
        let components = Self::default();
        components.enabled.store(enabled, Ordering::SeqCst);
        components.ignore.store(true, Ordering::SeqCst);
        Arc::new(components)
    }

    pub fn refusing(enabled: bool) -> Arc<Self> {
        let components = Self::default();
        components.enabled.store(enabled, Ordering::SeqCst);
        components.refuse.store(true, Ordering::SeqCst);
        Arc::new(components)
    }

    pub fn is_on(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    pub fn sets(&self) -> usize {
        self.sets.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ComponentTogglePort for FakeComponents {
    async fn set_enabled(
        &self,
        _component: &str,
        enabled: bool,
    ) -> Result<(), ComponentToggleError> {
        self.sets.fetch_add(1, Ordering::SeqCst);
        if self.refuse.load(Ordering::SeqCst) {
            return Err(ComponentToggleError::Refused("not allowed".into()));
        }
        if !self.ignore.load(Ordering::SeqCst) {
            self.enabled.store(enabled, Ordering::SeqCst);
        }
        Ok(())
    }

    async fn is_enabled(&self, _component: &str) -> Result<bool, ComponentToggleError> {
        Ok(self.enabled.load(Ordering::SeqCst))
    }
}

// ---------------------------------------------------------------------------
// Permission state and gateway
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FakePermissionState {
    granted: AtomicBool,
}

impl FakePermissionState {
    pub fn new(granted: bool) -> Arc<Self> {
        let state = Self::default();
        state.granted.store(granted, Ordering::SeqCst);
        Arc::new(state)
    }

    pub fn set(&self, granted: bool) {
        self.granted.store(granted, Ordering::SeqCst);
    }

    pub fn is_set(&self) -> bool {
        self.granted.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PermissionStatePort for FakePermissionState {
    async fn is_granted(&self, _application_id: &str, _permission: &str) -> anyhow::Result<bool> {
        Ok(self.granted.load(Ordering::SeqCst))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayBehavior {
    /// The grant takes effect.
    Grants,
    /// The call succeeds but the permission stays absent.
    NoEffect,
    Denies,
}

pub struct FakeGateway {
    behavior: GatewayBehavior,
    state: Arc<FakePermissionState>,
    calls: Mutex<Vec<GrantTarget>>,
}

impl FakeGateway {
    pub fn new(behavior: GatewayBehavior, state: Arc<FakePermissionState>) -> Arc<Self> {
        Arc::new(Self {
            behavior,
            state,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<GrantTarget> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PermissionGatewayPort for FakeGateway {
    async fn grant(&self, target: &GrantTarget) -> Result<(), GatewayError> {
        self.calls.lock().unwrap().push(target.clone());
        match self.behavior {
            GatewayBehavior::Grants => {
                self.state.set(true);
                Ok(())
            }
            GatewayBehavior::NoEffect => Ok(()),
            GatewayBehavior::Denies => Err(GatewayError::PermissionDenied("uid 2000".into())),
        }
    }
}

// ---------------------------------------------------------------------------
// Prompt
// ---------------------------------------------------------------------------

pub struct FixedPrompt {
    decision: UserDecision,
    prompts: Mutex<Vec<GrantPrompt>>,
}

impl FixedPrompt {
    pub fn new(decision: UserDecision) -> Self {
        Self {
            decision,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<GrantPrompt> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl GrantPromptPort for FixedPrompt {
    async fn choose(&self, prompt: &GrantPrompt) -> UserDecision {
        self.prompts.lock().unwrap().push(prompt.clone());
        self.decision
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub struct BootstrapFixture {
    pub probe: Arc<FakeProbe>,
    pub wireless: Arc<FakeWireless>,
    pub discovery: Arc<FakeDiscovery>,
    pub transport: Arc<FakeTransport>,
    pub notifier: Arc<RecordingNotifier>,
}

impl BootstrapFixture {
    /// Helper down, wireless debugging on, discovery yields 5555.
    pub fn new() -> Self {
        Self {
            probe: FakeProbe::new(false),
            wireless: FakeWireless::enabled(),
            discovery: FakeDiscovery::yielding(&[5555]),
            transport: FakeTransport::ok(),
            notifier: RecordingNotifier::new(),
        }
    }

    pub fn settings() -> BootstrapSettings {
        BootstrapSettings {
            host: HOST.to_string(),
            fallback_port: 5555,
            poll_interval: Duration::from_secs(1),
            service_type: "_adb-tls-connect._tcp".to_string(),
            start_command: START_COMMAND.to_string(),
        }
    }

    pub fn orchestrator(&self) -> BootstrapOrchestrator {
        BootstrapOrchestrator::new(
            BootstrapDeps {
                probe: self.probe.clone(),
                wireless: self.wireless.clone(),
                discovery: self.discovery.clone(),
                transport: self.transport.clone(),
                notifier: self.notifier.clone(),
            },
            Self::settings(),
        )
    }
}

pub struct PermissionFixture {
    pub store: Arc<InMemoryConfigStore>,
    pub components: Arc<FakeComponents>,
    pub permission: Arc<FakePermissionState>,
    pub gateway: Arc<FakeGateway>,
    pub probe: Arc<FakeProbe>,
    pub notifier: Arc<RecordingNotifier>,
}

impl PermissionFixture {
    pub fn new(
        store: InMemoryConfigStore,
        components: Arc<FakeComponents>,
        permission_granted: bool,
        gateway: GatewayBehavior,
        helper_reachable: bool,
    ) -> Self {
        let permission = FakePermissionState::new(permission_granted);
        Self {
            store: Arc::new(store),
            components,
            gateway: FakeGateway::new(gateway, Arc::clone(&permission)),
            permission,
            probe: FakeProbe::new(helper_reachable),
            notifier: RecordingNotifier::new(),
        }
    }

    pub fn settings() -> PermissionSettings {
        PermissionSettings {
            target: GrantTarget {
                application_id: "io.helperboot.manager".to_string(),
                permission: PERMISSION.to_string(),
                user_id: 0,
            },
            boot_component: BOOT_COMPONENT.to_string(),
            debug_tool: "adb".to_string(),
            settle_delay: Duration::ZERO,
        }
    }

    pub fn deps(&self) -> PermissionDeps {
        PermissionDeps {
            store: self.store.clone(),
            components: self.components.clone(),
            permission_state: self.permission.clone(),
            gateway: self.gateway.clone(),
            probe: self.probe.clone(),
            notifier: self.notifier.clone(),
        }
    }

    pub fn reconciler(&self) -> Arc<PermissionReconciler> {
        Arc::new(PermissionReconciler::new(self.deps(), Self::settings()))
    }

    pub fn flag(&self, key: &str) -> bool {
        self.store.snapshot().get(key).copied().unwrap_or(false)
    }
}
