//! Ctrl-C handling.

use log::{debug, warn};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Cancels `cancel` when the process receives Ctrl-C.
///
/// The returned task also ends when the token is cancelled by someone else, so
/// it never outlives the check.
pub fn cancel_on_ctrl_c(cancel: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::select! {
            res = tokio::signal::ctrl_c() => match res {
                Ok(()) => {
                    warn!("Interrupted, cancelling request");
                    cancel.cancel();
                }
                Err(e) => debug!("Cannot listen for Ctrl-C: {e}"),
            },
            _ = cancel.cancelled() => {}
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_handler_exits_when_token_cancelled() {
        let cancel = CancellationToken::new();
        let handle = cancel_on_ctrl_c(cancel.clone());
        cancel.cancel();
        tokio::time::timeout(std::time::Duration::from_secs(1), handle)
            .await
            .expect("handler stops")
            .expect("handler does not panic");
    }
}
