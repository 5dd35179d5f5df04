//! # hb-core
//!
//! Core domain models and decision rules for helperboot.
//!
//! This crate contains pure logic without any infrastructure dependencies:
//! boot-mode resolution, bootstrap outcomes, grant results and the port
//! interfaces implemented by the infrastructure and platform layers.

pub mod boot;
pub mod config;
pub mod discovery;
pub mod grant;
pub mod helper;
pub mod ids;
pub mod keys;
pub mod outcome;
pub mod ports;

// Re-export commonly used types at the crate root
pub use boot::{BootFlags, BootMode, BootTarget, StatePolicy, ToggleInstruction};
pub use config::AppConfig;
pub use discovery::DiscoveryResult;
pub use grant::{FallbackOutcome, GrantError, GrantResult, GrantTarget, UserDecision};
pub use helper::HelperReachability;
pub use ids::RunId;
pub use outcome::{BootstrapOutcome, TransportErrorKind};
