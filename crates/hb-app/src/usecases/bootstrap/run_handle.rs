use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use hb_core::{BootstrapOutcome, RunId};

/// Handle to one bootstrap run.
///
/// Clones share the same run: every clone observes the same outcome and
/// cancelling any clone cancels the run.
#[derive(Debug, Clone)]
pub struct RunHandle {
    id: RunId,
    outcome: watch::Receiver<Option<BootstrapOutcome>>,
    cancel: CancellationToken,
}

impl RunHandle {
    pub(crate) fn new(
        id: RunId,
        outcome: watch::Receiver<Option<BootstrapOutcome>>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            id,
            outcome,
            cancel,
        }
    }

    pub fn id(&self) -> &RunId {
        &self.id
    }

    /// Abort the run. It completes with [`BootstrapOutcome::Cancelled`]
    /// unless it already finished.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// The run produced an outcome, or its task is gone.
    pub fn is_finished(&self) -> bool {
        self.outcome.borrow().is_some() || self.outcome.has_changed().is_err()
    }

    pub fn try_outcome(&self) -> Option<BootstrapOutcome> {
        *self.outcome.borrow()
    }

    /// Wait for the run to finish.
    ///
    /// A run whose task vanished without reporting counts as cancelled.
    pub async fn outcome(&self) -> BootstrapOutcome {
        let mut rx = self.outcome.clone();
        let outcome = match rx.wait_for(Option::is_some).await {
            Ok(value) => (*value).unwrap_or(BootstrapOutcome::Cancelled),
            Err(_) => BootstrapOutcome::Cancelled,
        };
        outcome
    }
}
