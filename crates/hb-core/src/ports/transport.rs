use async_trait::async_trait;
use thiserror::Error;

use crate::outcome::TransportErrorKind;

/// Debug-bridge client failure.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Authentication / key exchange rejected.
    #[error("debug key error: {0}")]
    Key(String),

    /// Connection refused or endpoint unreachable.
    #[error("connection failed: {0}")]
    Connect(String),

    #[error("{0}")]
    Other(String),
}

impl TransportError {
    pub fn kind(&self) -> TransportErrorKind {
        match self {
            Self::Key(_) => TransportErrorKind::Key,
            Self::Connect(_) => TransportErrorKind::Connect,
            Self::Other(_) => TransportErrorKind::Other,
        }
    }
}

/// Black-box debug-bridge client.
#[async_trait]
pub trait TransportPort: Send + Sync {
    async fn connect(
        &self,
        host: &str,
        port: u16,
    ) -> Result<Box<dyn TransportSession>, TransportError>;
}

/// An open debug-bridge connection.
#[async_trait]
pub trait TransportSession: Send {
    async fn authenticate(&mut self) -> Result<(), TransportError>;

    /// Run a shell command on the device, returning its output.
    async fn send_command(&mut self, command: &str) -> Result<String, TransportError>;
}
