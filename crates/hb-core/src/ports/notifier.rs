use async_trait::async_trait;

use crate::outcome::TransportErrorKind;

/// Transient user-facing notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    StartingHelper,
    HelperStartFailed {
        kind: TransportErrorKind,
        endpoint: String,
        message: String,
    },
    PermissionGranted,
    PermissionGrantFailed,
    /// Automatic grant chosen while the helper is down.
    StartHelperFirst,
    ComponentToggleFailed,
}

impl Notice {
    pub fn message(&self) -> String {
        match self {
            Self::StartingHelper => "Starting helper service…".to_string(),
            Self::HelperStartFailed { kind, endpoint, message } => match kind {
                TransportErrorKind::Key => "Debug key error during helper start".to_string(),
                TransportErrorKind::Connect => format!("Debug connection failed to {endpoint}"),
                TransportErrorKind::Other => format!("Error: {message}"),
            },
            Self::PermissionGranted => "Permission granted".to_string(),
            Self::PermissionGrantFailed => "Failed to grant permission".to_string(),
            Self::StartHelperFirst => "Start the helper service first".to_string(),
            Self::ComponentToggleFailed => "Could not change the boot component state".to_string(),
        }
    }

    /// Failures are shown longer than confirmations.
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Self::HelperStartFailed { .. }
                | Self::PermissionGrantFailed
                | Self::StartHelperFirst
                | Self::ComponentToggleFailed
        )
    }
}

/// Toast-equivalent surface. Notifications never fail the caller.
#[async_trait]
pub trait NotifierPort: Send + Sync {
    async fn notify(&self, notice: Notice);
}
