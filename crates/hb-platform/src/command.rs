//! External command execution shared by the platform adapters.

use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, trace};

/// Captured result of one finished command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// `None` when the process was killed by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// stdout followed by stderr, for tools that report errors on either.
    pub fn combined(&self) -> String {
        match (self.stdout.trim(), self.stderr.trim()) {
            (out, "") => out.to_string(),
            ("", err) => err.to_string(),
            (out, err) => format!("{out}\n{err}"),
        }
    }
}

/// Runs a program to completion.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput>;
}

/// [`CommandRunner`] backed by `tokio::process` with a per-command timeout.
///
/// A command that outlives the timeout is killed.
pub struct ProcessCommandRunner {
    timeout: Duration,
}

impl ProcessCommandRunner {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl CommandRunner for ProcessCommandRunner {
    async fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput> {
        trace!(program, ?args, "spawning command");
        let mut cmd = Command::new(program);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let child = cmd
            .spawn()
            .with_context(|| format!("failed to spawn {program}"))?;

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| anyhow!("{program} timed out after {}s", self.timeout.as_secs()))?
            .with_context(|| format!("failed to wait for {program}"))?;

        let result = CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        debug!(program, code = ?result.code, "command finished");
        Ok(result)
    }
}

/// A shell entry point: an argv prefix that takes one command string,
/// e.g. `["sh", "-c"]` or `["rish", "-c"]`.
#[derive(Clone)]
pub struct ShellEntry {
    runner: Arc<dyn CommandRunner>,
    argv: Vec<String>,
}

impl ShellEntry {
    pub fn new(runner: Arc<dyn CommandRunner>, argv: Vec<String>) -> Self {
        Self { runner, argv }
    }

    pub async fn exec(&self, command: &str) -> Result<CommandOutput> {
        let Some((program, prefix)) = self.argv.split_first() else {
            bail!("shell entry point is not configured");
        };
        let mut args = prefix.to_vec();
        args.push(command.to_string());
        self.runner.run(program, &args).await
    }
}
