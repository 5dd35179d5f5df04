//! Use cases.
//!
//! [BootstrapOrchestrator]  → start the helper over the debug transport
//! [PermissionReconciler]   → pending grant + boot flag reconciliation
//! [BootModeToggle]         → user switches a boot mode on/off
//! [BootStatus]             → read-only snapshot for surfaces

pub mod bootstrap;
pub mod permission;
pub mod status;

pub use bootstrap::{
    BootstrapDeps, BootstrapError, BootstrapOrchestrator, BootstrapSettings, ConcurrentRunPolicy,
    RunHandle,
};
pub use permission::{
    BootModeToggle, PermissionDeps, PermissionReconciler, PermissionSettings, ReconcileError,
    ReconcileReport, ToggleError,
};
pub use status::{BootStatus, BootStatusView};
