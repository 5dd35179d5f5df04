use async_trait::async_trait;
use tracing::{info, warn};

use hb_core::ports::{Notice, NotifierPort};

/// Prints notices to stderr, the terminal counterpart of a toast.
pub struct ConsoleNotifier;

#[async_trait]
impl NotifierPort for ConsoleNotifier {
    async fn notify(&self, notice: Notice) {
        let message = notice.message();
        if notice.is_error() {
            warn!(?notice, "notice");
        } else {
            info!(?notice, "notice");
        }
        eprintln!("{message}");
    }
}
