use serde::{Deserialize, Serialize};

/// Effective boot mode.
///
/// At most one of `LocalBoot` / `WirelessBoot` is active at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BootMode {
    Disabled,
    LocalBoot,
    WirelessBoot,
}

impl Default for BootMode {
    fn default() -> Self {
        Self::Disabled
    }
}

/// A boot mode that can be switched on or off by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BootTarget {
    Local,
    Wireless,
}

impl BootTarget {
    pub fn mode(self) -> BootMode {
        match self {
            Self::Local => BootMode::LocalBoot,
            Self::Wireless => BootMode::WirelessBoot,
        }
    }

    /// The mutually exclusive counterpart.
    pub fn other(self) -> Self {
        match self {
            Self::Local => Self::Wireless,
            Self::Wireless => Self::Local,
        }
    }

    /// Persisted flag key backing this target.
    pub fn key(self) -> &'static str {
        match self {
            Self::Local => crate::keys::BOOT_LOCAL_ENABLED,
            Self::Wireless => crate::keys::BOOT_WIRELESS_ENABLED,
        }
    }
}

/// Raw persisted representation of the boot mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BootFlags {
    pub local: bool,
    pub wireless: bool,
}

impl BootFlags {
    pub fn new(local: bool, wireless: bool) -> Self {
        Self { local, wireless }
    }

    pub fn get(&self, target: BootTarget) -> bool {
        match target {
            BootTarget::Local => self.local,
            BootTarget::Wireless => self.wireless,
        }
    }

    pub fn set(&mut self, target: BootTarget, value: bool) {
        match target {
            BootTarget::Local => self.local = value,
            BootTarget::Wireless => self.wireless = value,
        }
    }

    /// Flags whose value differs between `self` and `other`.
    pub fn changed_targets(&self, other: &BootFlags) -> Vec<BootTarget> {
        [BootTarget::Local, BootTarget::Wireless]
            .into_iter()
            .filter(|target| self.get(*target) != other.get(*target))
            .collect()
    }
}
