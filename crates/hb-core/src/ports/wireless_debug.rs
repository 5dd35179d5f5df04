use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WirelessDebugError {
    #[error("not allowed to change wireless debugging: {0}")]
    PermissionDenied(String),

    /// Preconditions for wireless debugging not met (e.g. no Wi-Fi).
    #[error("wireless debugging unavailable: {0}")]
    Validation(String),

    #[error("wireless debugging setting failed: {0}")]
    Platform(String),
}

/// Wireless debug transport switch.
#[async_trait]
pub trait WirelessDebugPort: Send + Sync {
    async fn is_enabled(&self) -> Result<bool, WirelessDebugError>;

    /// Ask the platform to enable the transport. Completion is observed by
    /// polling [`WirelessDebugPort::is_enabled`].
    async fn request_enable(&self) -> Result<(), WirelessDebugError>;
}
