//! Terminal results of one bootstrap run.

use serde::{Deserialize, Serialize};

/// Class of a debug-transport failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportErrorKind {
    /// Authentication or key-exchange failure.
    Key,
    /// Connection refused or endpoint unreachable.
    Connect,
    Other,
}

impl std::fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Key => "key",
            Self::Connect => "connect",
            Self::Other => "other",
        };
        f.write_str(name)
    }
}

/// Result of one orchestration run.
///
/// Timeouts and cancellations are outcomes, not errors: the caller decides
/// whether to offer a manual fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "outcome", content = "kind")]
pub enum BootstrapOutcome {
    AlreadyRunning,
    Started,
    TimedOut,
    TransportError(TransportErrorKind),
    Cancelled,
}

impl BootstrapOutcome {
    /// The helper is running after this run.
    pub fn is_running(&self) -> bool {
        matches!(self, Self::AlreadyRunning | Self::Started)
    }
}

impl std::fmt::Display for BootstrapOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AlreadyRunning => f.write_str("already running"),
            Self::Started => f.write_str("started"),
            Self::TimedOut => f.write_str("timed out"),
            Self::TransportError(kind) => write!(f, "transport error ({kind})"),
            Self::Cancelled => f.write_str("cancelled"),
        }
    }
}
