//! # hb-platform
//!
//! Platform-specific implementations for helperboot.
//!
//! Every adapter here talks to the device through external tools: the
//! device shell, the helper's shell entry point and the `adb` client.

pub mod adapters;
pub mod app_dirs;
pub mod command;

pub use app_dirs::{AppDirs, AppDirsError, DirsAppDirsAdapter};
pub use command::{CommandOutput, CommandRunner, ProcessCommandRunner, ShellEntry};
