use async_trait::async_trait;

use crate::helper::HelperReachability;

/// Liveness probe for the helper service.
#[async_trait]
pub trait HelperProbePort: Send + Sync {
    async fn ping(&self) -> HelperReachability;
}
