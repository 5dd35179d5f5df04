//! Command line surface.

use std::path::PathBuf;

use clap::{ArgGroup, Parser, Subcommand, ValueEnum};
use hb_core::BootTarget;

#[derive(Debug, Parser)]
#[command(
    name = "helperboot",
    version,
    about = "Start the privileged helper over wireless debugging and manage its boot modes"
)]
pub struct Cli {
    /// Configuration file (TOML). Defaults to the per-user config dir.
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand, PartialEq, Eq)]
pub enum Command {
    /// Start the helper through the debug transport.
    Start {
        /// Overall deadline for the run.
        #[arg(long, value_name = "SECS")]
        timeout_secs: Option<u64>,
    },
    /// Retry a pending grant and correct the boot flags.
    Resume,
    /// Complete a pending permission grant now.
    Grant,
    /// Resolve a missing permission, automatically or manually.
    #[command(group(ArgGroup::new("path").args(["auto", "manual"])))]
    RequestGrant {
        /// Grant through the helper.
        #[arg(long)]
        auto: bool,
        /// Print the command to run by hand.
        #[arg(long)]
        manual: bool,
    },
    /// Give up a pending grant so later resumes stop retrying it.
    AbandonGrant,
    /// Switch a boot mode on or off.
    BootMode {
        #[arg(value_enum)]
        target: TargetArg,
        #[arg(value_enum)]
        state: SwitchArg,
    },
    /// Show the current boot status.
    Status,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TargetArg {
    Local,
    Wireless,
}

impl From<TargetArg> for BootTarget {
    fn from(arg: TargetArg) -> Self {
        match arg {
            TargetArg::Local => BootTarget::Local,
            TargetArg::Wireless => BootTarget::Wireless,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SwitchArg {
    On,
    Off,
}

impl SwitchArg {
    pub fn is_on(self) -> bool {
        matches!(self, Self::On)
    }
}
