//! Port interfaces for the application layer
//!
//! Ports define the contract between the bootstrap / grant use cases and
//! the infrastructure and platform implementations. The debug bridge, the
//! service discovery client, the package manager and the helper itself are
//! all consumed through these traits only.

pub mod component;
pub mod config_store;
pub mod discovery;
pub mod helper_probe;
pub mod notifier;
pub mod permission;
pub mod prompt;
pub mod transport;
pub mod wireless_debug;

pub use component::{ComponentToggleError, ComponentTogglePort};
pub use config_store::{load_boot_flags, ConfigStorePort};
pub use discovery::{DiscoveryError, DiscoveryPort};
pub use helper_probe::HelperProbePort;
pub use notifier::{Notice, NotifierPort};
pub use permission::{GatewayError, PermissionGatewayPort, PermissionStatePort};
pub use prompt::GrantPromptPort;
pub use transport::{TransportError, TransportPort, TransportSession};
pub use wireless_debug::{WirelessDebugError, WirelessDebugPort};
