use async_trait::async_trait;
use thiserror::Error;

use crate::grant::GrantTarget;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("helper unavailable: {0}")]
    Unavailable(String),

    #[error("grant call failed: {0}")]
    Failed(String),
}

/// Privileged call surface exposed by the running helper.
///
/// Granting an already granted permission is not an error.
#[async_trait]
pub trait PermissionGatewayPort: Send + Sync {
    async fn grant(&self, target: &GrantTarget) -> Result<(), GatewayError>;
}

/// Independent read of the OS permission state.
#[async_trait]
pub trait PermissionStatePort: Send + Sync {
    async fn is_granted(&self, application_id: &str, permission: &str) -> anyhow::Result<bool>;
}

#[cfg(test)]
mockall::mock! {
    pub Gateway {}

    #[async_trait]
    impl PermissionGatewayPort for Gateway {
        async fn grant(&self, target: &GrantTarget) -> Result<(), GatewayError>;
    }
}
