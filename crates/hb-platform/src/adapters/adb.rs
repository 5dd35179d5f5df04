//! Debug-bridge transport through the `adb` command line client.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use hb_core::ports::{TransportError, TransportPort, TransportSession};

use crate::command::CommandRunner;

pub struct AdbCliTransport {
    runner: Arc<dyn CommandRunner>,
    tool: String,
}

impl AdbCliTransport {
    pub fn new(runner: Arc<dyn CommandRunner>, tool: impl Into<String>) -> Self {
        Self {
            runner,
            tool: tool.into(),
        }
    }
}

#[async_trait]
impl TransportPort for AdbCliTransport {
    async fn connect(
        &self,
        host: &str,
        port: u16,
    ) -> Result<Box<dyn TransportSession>, TransportError> {
        let serial = format!("{host}:{port}");
        let output = self
            .runner
            .run(&self.tool, &["connect".to_string(), serial.clone()])
            .await
            .map_err(|e| TransportError::Other(format!("{e:#}")))?;

        // `adb connect` exits 0 on most failures; only the text is reliable.
        let text = output.combined();
        if !is_connected(&text) {
            return Err(classify(&text));
        }
        info!(%serial, "debug bridge connected");

        Ok(Box::new(AdbCliSession {
            runner: Arc::clone(&self.runner),
            tool: self.tool.clone(),
            serial,
        }))
    }
}

struct AdbCliSession {
    runner: Arc<dyn CommandRunner>,
    tool: String,
    serial: String,
}

impl AdbCliSession {
    async fn adb(&self, args: &[&str]) -> Result<crate::command::CommandOutput, TransportError> {
        let mut argv = vec!["-s".to_string(), self.serial.clone()];
        argv.extend(args.iter().map(|arg| arg.to_string()));
        self.runner
            .run(&self.tool, &argv)
            .await
            .map_err(|e| TransportError::Other(format!("{e:#}")))
    }
}

#[async_trait]
impl TransportSession for AdbCliSession {
    /// Key exchange happens during `connect`; this confirms the device
    /// accepted it.
    async fn authenticate(&mut self) -> Result<(), TransportError> {
        let output = self.adb(&["get-state"]).await?;
        let text = output.combined();
        if output.success() && text.trim() == "device" {
            debug!(serial = %self.serial, "debug bridge authorized");
            return Ok(());
        }
        Err(classify(&text))
    }

    async fn send_command(&mut self, command: &str) -> Result<String, TransportError> {
        let output = self.adb(&["shell", command]).await?;
        if !output.success() {
            return Err(classify(&output.combined()));
        }
        Ok(output.stdout)
    }
}

fn is_connected(text: &str) -> bool {
    let text = text.trim_start().to_ascii_lowercase();
    text.starts_with("connected to") || text.starts_with("already connected to")
}

/// Map `adb` error text onto the transport error taxonomy.
fn classify(text: &str) -> TransportError {
    let lower = text.to_ascii_lowercase();
    let message = text.trim().to_string();

    if lower.contains("failed to authenticate") || lower.contains("unauthorized") {
        TransportError::Key(message)
    } else if ["refused", "unreachable", "cannot connect", "failed to connect", "no route"]
        .iter()
        .any(|needle| lower.contains(needle))
    {
        TransportError::Connect(message)
    } else {
        TransportError::Other(message)
    }
}
