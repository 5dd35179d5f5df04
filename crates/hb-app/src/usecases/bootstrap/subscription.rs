use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use hb_core::ports::{DiscoveryError, DiscoveryPort};
use hb_core::DiscoveryResult;

const RESULT_BUFFER: usize = 16;

/// Discovery session owned by one bootstrap run.
///
/// The session is stopped when the subscription is closed or dropped,
/// whichever happens first, so every exit path of the run releases it.
pub(crate) struct DiscoverySubscription {
    discovery: Arc<dyn DiscoveryPort>,
    results: mpsc::Receiver<u32>,
    active: bool,
}

impl DiscoverySubscription {
    pub(crate) async fn open(
        discovery: Arc<dyn DiscoveryPort>,
        service_type: &str,
    ) -> Result<Self, DiscoveryError> {
        let (tx, rx) = mpsc::channel(RESULT_BUFFER);
        discovery.start(service_type, tx).await?;
        info!(service_type, "discovery session started");
        Ok(Self {
            discovery,
            results: rx,
            active: true,
        })
    }

    /// First in-range port reported by the session, in delivery order.
    ///
    /// Out-of-range candidates are logged and skipped. `None` when the
    /// session ends without a usable port.
    pub(crate) async fn first_valid(&mut self, host: &str) -> Option<DiscoveryResult> {
        while let Some(candidate) = self.results.recv().await {
            match DiscoveryResult::from_candidate(host, candidate) {
                Some(result) => {
                    info!(port = result.port, "discovered debug port");
                    return Some(result);
                }
                None => warn!(candidate, "discovery returned invalid port"),
            }
        }
        None
    }

    pub(crate) fn close(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        // Later notifications fail to send instead of queueing.
        self.results.close();
        self.discovery.stop();
        debug!("discovery session stopped");
    }
}

impl Drop for DiscoverySubscription {
    fn drop(&mut self) {
        self.close();
    }
}
