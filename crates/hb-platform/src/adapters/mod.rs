//! Port implementations driving on-device tools.

mod adb;
mod component;
mod helper_shell;
mod mdns;
mod permission_state;
mod wireless_debug;

pub use adb::AdbCliTransport;
pub use component::PackageManagerComponentToggle;
pub use helper_shell::{HelperShellGateway, HelperShellProbe};
pub use mdns::AdbMdnsDiscovery;
pub use permission_state::DumpsysPermissionState;
pub use wireless_debug::SettingsWirelessDebug;
