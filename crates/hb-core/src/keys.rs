//! Persisted configuration keys.
//!
//! The two boot flags are the storage representation of [`BootMode`];
//! read them through [`StatePolicy`] rather than interpreting them directly.
//!
//! [`BootMode`]: crate::boot::BootMode
//! [`StatePolicy`]: crate::boot::StatePolicy

/// Start the helper at boot using the local (root) trigger.
pub const BOOT_LOCAL_ENABLED: &str = "boot.local.enabled";

/// Start the helper at boot over wireless debugging.
pub const BOOT_WIRELESS_ENABLED: &str = "boot.wireless.enabled";

/// An automatic permission grant was requested but not yet confirmed.
pub const GRANT_PERMISSION_PENDING: &str = "grant.permission.pending";

pub const ALL: [&str; 3] = [
    BOOT_LOCAL_ENABLED,
    BOOT_WIRELESS_ENABLED,
    GRANT_PERMISSION_PENDING,
];
