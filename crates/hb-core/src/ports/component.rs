use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ComponentToggleError {
    #[error("component state change refused: {0}")]
    Refused(String),

    #[error("component state query failed: {0}")]
    Query(String),
}

/// Enables or disables the boot-trigger registration.
#[async_trait]
pub trait ComponentTogglePort: Send + Sync {
    async fn set_enabled(&self, component: &str, enabled: bool)
        -> Result<(), ComponentToggleError>;

    async fn is_enabled(&self, component: &str) -> Result<bool, ComponentToggleError>;
}
