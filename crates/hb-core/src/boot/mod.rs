//! Boot-mode domain module.
//!
//! Boot mode decides whether and how the helper is started when the
//! device boots. It is persisted as two independent flags and interpreted
//! through [`StatePolicy`] as a single [`BootMode`].

pub mod mode;
pub mod policy;

pub use mode::{BootFlags, BootMode, BootTarget};
pub use policy::{StatePolicy, ToggleInstruction};
