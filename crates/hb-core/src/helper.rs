use serde::{Deserialize, Serialize};

/// Whether the helper service answered a liveness probe.
///
/// Derived on demand and never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HelperReachability {
    Unknown,
    Reachable,
    Unreachable,
}

impl HelperReachability {
    pub fn is_reachable(self) -> bool {
        matches!(self, Self::Reachable)
    }
}

impl Default for HelperReachability {
    fn default() -> Self {
        Self::Unknown
    }
}
