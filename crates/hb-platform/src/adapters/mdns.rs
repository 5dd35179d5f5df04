//! Service discovery through `adb mdns`.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use hb_core::ports::{DiscoveryError, DiscoveryPort};

use crate::command::CommandRunner;

/// Polls `adb mdns services` and reports each newly seen port of the
/// requested service type.
pub struct AdbMdnsDiscovery {
    runner: Arc<dyn CommandRunner>,
    tool: String,
    poll_interval: Duration,
    session: Mutex<Option<JoinHandle<()>>>,
}

impl AdbMdnsDiscovery {
    pub fn new(
        runner: Arc<dyn CommandRunner>,
        tool: impl Into<String>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            runner,
            tool: tool.into(),
            poll_interval,
            session: Mutex::new(None),
        }
    }

    fn replace_session(&self, next: Option<JoinHandle<()>>) {
        let mut slot = self.session.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(previous) = std::mem::replace(&mut *slot, next) {
            previous.abort();
        }
    }
}

#[async_trait]
impl DiscoveryPort for AdbMdnsDiscovery {
    async fn supports_discovery(&self) -> bool {
        match self
            .runner
            .run(&self.tool, &["mdns".to_string(), "check".to_string()])
            .await
        {
            Ok(output) => {
                let supported =
                    output.success() && output.combined().contains("mdns daemon version");
                debug!(supported, "mdns support checked");
                supported
            }
            Err(err) => {
                warn!(error = %format!("{err:#}"), "mdns check failed");
                false
            }
        }
    }

    async fn start(
        &self,
        service_type: &str,
        results: mpsc::Sender<u32>,
    ) -> Result<(), DiscoveryError> {
        if !self.supports_discovery().await {
            return Err(DiscoveryError::Unsupported);
        }

        let runner = Arc::clone(&self.runner);
        let tool = self.tool.clone();
        let service_type = service_type.to_string();
        let poll_interval = self.poll_interval;

        let task = tokio::spawn(async move {
            let args = ["mdns".to_string(), "services".to_string()];
            let mut seen = HashSet::new();
            loop {
                match runner.run(&tool, &args).await {
                    Ok(output) => {
                        for port in service_ports(&output.stdout, &service_type) {
                            if seen.insert(port) && results.send(port).await.is_err() {
                                debug!("discovery receiver closed");
                                return;
                            }
                        }
                    }
                    Err(err) => warn!(error = %format!("{err:#}"), "mdns services poll failed"),
                }
                if results.is_closed() {
                    return;
                }
                tokio::time::sleep(poll_interval).await;
            }
        });

        self.replace_session(Some(task));
        info!("mdns discovery started");
        Ok(())
    }

    fn stop(&self) {
        self.replace_session(None);
    }
}

impl Drop for AdbMdnsDiscovery {
    fn drop(&mut self) {
        self.replace_session(None);
    }
}

/// Ports of `service_type` entries in `adb mdns services` output.
///
/// Lines look like `<instance>\t<service>.\t<address>:<port>`. Ports are
/// returned unvalidated.
fn service_ports(output: &str, service_type: &str) -> Vec<u32> {
    let wanted = service_type.trim_end_matches('.');
    output
        .lines()
        .filter_map(|line| {
            let fields: Vec<&str> = line.split_whitespace().collect();
            if !fields.iter().any(|field| field.trim_end_matches('.') == wanted) {
                return None;
            }
            let (_, port) = fields.last()?.rsplit_once(':')?;
            port.parse::<u32>().ok()
        })
        .collect()
}
