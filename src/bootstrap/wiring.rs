//! Dependency injection.
//!
//! The only place that depends on hb-infra, hb-platform and hb-app at the
//! same time. It assembles; it does not decide.

use std::sync::Arc;
use std::time::Duration;

use hb_app::usecases::{
    BootModeToggle, BootStatus, BootstrapDeps, BootstrapOrchestrator, BootstrapSettings,
    PermissionDeps, PermissionReconciler, PermissionSettings,
};
use hb_core::config::AppConfig;
use hb_core::ports::{
    ComponentTogglePort, ConfigStorePort, DiscoveryPort, HelperProbePort, NotifierPort,
    PermissionGatewayPort, PermissionStatePort, TransportPort, WirelessDebugPort,
};
use hb_infra::FileConfigStore;
use hb_platform::adapters::{
    AdbCliTransport, AdbMdnsDiscovery, DumpsysPermissionState, HelperShellGateway,
    HelperShellProbe, PackageManagerComponentToggle, SettingsWirelessDebug,
};
use hb_platform::{CommandRunner, ProcessCommandRunner, ShellEntry};

use crate::adapters::ConsoleNotifier;

pub type WiringResult<T> = Result<T, WiringError>;

/// Configuration that cannot be assembled into services.
#[derive(Debug, thiserror::Error)]
pub enum WiringError {
    #[error("{0} shell is empty; set tools.{0}_shell in the config file")]
    ShellNotConfigured(&'static str),

    #[error("debug tool is empty; set tools.debug_tool in the config file")]
    DebugToolNotConfigured,

    #[error("state file path is empty")]
    StateFileNotConfigured,
}

/// Fully wired use cases for one process.
pub struct AppServices {
    pub orchestrator: BootstrapOrchestrator,
    pub reconciler: Arc<PermissionReconciler>,
    pub toggle: BootModeToggle,
    pub status: BootStatus,
    /// Default budget of `start` when none is given on the command line.
    pub bootstrap_timeout: Duration,
}

fn shell_entry(
    runner: &Arc<dyn CommandRunner>,
    argv: &[String],
    name: &'static str,
) -> WiringResult<ShellEntry> {
    if argv.is_empty() {
        return Err(WiringError::ShellNotConfigured(name));
    }
    Ok(ShellEntry::new(runner.clone(), argv.to_vec()))
}

/// Build every adapter and inject it into the use cases.
///
/// Must be called inside a tokio runtime: the discovery adapter spawns its
/// poll task on start.
pub fn wire_services(config: &AppConfig) -> WiringResult<AppServices> {
    let tools = &config.tools;
    if tools.debug_tool.is_empty() {
        return Err(WiringError::DebugToolNotConfigured);
    }
    if config.storage.state_file.as_os_str().is_empty() {
        return Err(WiringError::StateFileNotConfigured);
    }

    let runner: Arc<dyn CommandRunner> =
        Arc::new(ProcessCommandRunner::new(tools.command_timeout()));
    let device_shell = shell_entry(&runner, &tools.device_shell, "device")?;
    let helper_shell = shell_entry(&runner, &tools.helper_shell, "helper")?;

    let store: Arc<dyn ConfigStorePort> =
        Arc::new(FileConfigStore::new(config.storage.state_file.clone()));
    let notifier: Arc<dyn NotifierPort> = Arc::new(ConsoleNotifier);

    let probe: Arc<dyn HelperProbePort> = Arc::new(HelperShellProbe::new(helper_shell.clone()));
    let gateway: Arc<dyn PermissionGatewayPort> = Arc::new(HelperShellGateway::new(helper_shell));
    let wireless: Arc<dyn WirelessDebugPort> =
        Arc::new(SettingsWirelessDebug::new(device_shell.clone()));
    let components: Arc<dyn ComponentTogglePort> =
        Arc::new(PackageManagerComponentToggle::new(device_shell.clone()));
    let permission_state: Arc<dyn PermissionStatePort> =
        Arc::new(DumpsysPermissionState::new(device_shell));
    let transport: Arc<dyn TransportPort> =
        Arc::new(AdbCliTransport::new(runner.clone(), tools.debug_tool.clone()));
    let discovery: Arc<dyn DiscoveryPort> = Arc::new(AdbMdnsDiscovery::new(
        runner,
        tools.debug_tool.clone(),
        tools.discovery_poll(),
    ));

    let orchestrator = BootstrapOrchestrator::new(
        BootstrapDeps {
            probe: probe.clone(),
            wireless: wireless.clone(),
            discovery,
            transport,
            notifier: notifier.clone(),
        },
        BootstrapSettings::from(&config.bootstrap),
    );

    let reconciler = Arc::new(PermissionReconciler::new(
        PermissionDeps {
            store,
            components,
            permission_state,
            gateway,
            probe,
            notifier,
        },
        PermissionSettings::from(config),
    ));

    Ok(AppServices {
        orchestrator,
        toggle: BootModeToggle::new(reconciler.clone()),
        status: BootStatus::new(reconciler.clone(), wireless),
        reconciler,
        bootstrap_timeout: config.bootstrap.timeout(),
    })
}
