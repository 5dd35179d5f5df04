//! Permission grant domain types.

use serde::{Deserialize, Serialize};

/// The permission this application asks the helper to grant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantTarget {
    pub application_id: String,
    pub permission: String,
    pub user_id: u32,
}

impl GrantTarget {
    /// Shell command the user can run out-of-band to grant the permission.
    ///
    /// Shown and copied only; never executed by the manual path.
    pub fn manual_command(&self, debug_tool: &str) -> String {
        format!(
            "{debug_tool} shell pm grant {} {}",
            self.application_id, self.permission
        )
    }
}

/// Why an automatic grant did not complete.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum GrantError {
    /// The gateway call returned but the permission is still absent.
    #[error("grant did not take effect")]
    VerificationFailed,

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("permission gateway failed: {0}")]
    Gateway(String),

    #[error("grant state unavailable: {0}")]
    State(String),
}

/// Result of one automatic grant attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrantResult {
    /// Permission verified as granted; the pending flag was cleared.
    Granted,
    /// No grant was pending.
    NotPending,
    /// Helper not reachable; the pending flag stays set for a later retry.
    Deferred,
    /// The attempt failed; the pending flag stays set.
    Failed(GrantError),
}

impl GrantResult {
    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Granted)
    }
}

/// User choice when the permission is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserDecision {
    Automatic,
    Manual,
    Cancel,
}

/// Information presented to the user when the permission is missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantPrompt {
    pub permission: String,
    pub manual_command: String,
}

/// What `request_with_fallback` did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackOutcome {
    /// Permission already present; nothing was asked.
    AlreadyGranted,
    /// A grant is already pending; it is retried on the next resume.
    AlreadyPending,
    /// Automatic path chosen.
    Automatic(GrantResult),
    /// Manual path chosen; the command to run out-of-band.
    Manual { command: String },
    Dismissed,
}
