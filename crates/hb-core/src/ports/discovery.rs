use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("service discovery is not supported on this platform")]
    Unsupported,

    #[error("failed to start discovery: {0}")]
    Start(String),
}

/// Service discovery for the debug endpoint on the local network.
///
/// At most one session is active per implementation instance. Candidate
/// ports are delivered on `results` in discovery order, unvalidated.
#[async_trait]
pub trait DiscoveryPort: Send + Sync {
    async fn supports_discovery(&self) -> bool;

    async fn start(
        &self,
        service_type: &str,
        results: mpsc::Sender<u32>,
    ) -> Result<(), DiscoveryError>;

    /// Stop the active session. Idempotent.
    fn stop(&self);
}
