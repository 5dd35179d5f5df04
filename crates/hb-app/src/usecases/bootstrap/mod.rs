//! Helper bootstrap over the wireless debug transport.

mod orchestrator;
mod run_handle;
mod subscription;

pub use orchestrator::{
    BootstrapDeps, BootstrapError, BootstrapOrchestrator, BootstrapSettings, ConcurrentRunPolicy,
};
pub use run_handle::RunHandle;
