//! helperboot application orchestration layer
//!
//! This crate contains the bootstrap orchestrator and the permission-grant
//! use cases. Everything external is reached through `hb_core::ports`.

pub mod usecases;

pub use usecases::{
    BootModeToggle, BootStatus, BootstrapDeps, BootstrapOrchestrator, BootstrapSettings,
    PermissionDeps, PermissionReconciler, PermissionSettings, RunHandle,
};
