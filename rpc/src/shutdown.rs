//! Stopping `ballot serve` cleanly.
//!
//! [`RpcServer::start`](crate::RpcServer::start) takes a shutdown receiver
//! and hands it to axum's graceful shutdown: the listener stops accepting,
//! in-flight `/simulate` and `/api/proposals` requests finish, then `start`
//! returns. The daemon wires SIGINT/SIGTERM to that receiver through a
//! [`ShutdownController`].

use tokio::signal;
use tokio::sync::broadcast;
use tracing::{info, warn};

/// Fans one stop request out to every server holding a receiver.
///
/// A receiver taken after the stop was sent never sees it, so subscribe
/// before spawning the server.
pub struct ShutdownController {
    tx: broadcast::Sender<()>,
}

impl ShutdownController {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Receiver to pass to [`RpcServer::start`](crate::RpcServer::start).
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Ask every subscribed server to drain and stop. Calling it with no
    /// server running is a no-op.
    pub fn shutdown(&self) {
        let _ = self.tx.send(());
    }

    /// Block until the process gets SIGINT or SIGTERM, then stop the servers.
    ///
    /// If the SIGTERM handler cannot be installed only Ctrl-C stops the
    /// server.
    pub async fn wait_for_signal(&self) {
        let ctrl_c = signal::ctrl_c();

        #[cfg(unix)]
        let terminate = async {
            match signal::unix::signal(signal::unix::SignalKind::terminate()) {
                Ok(mut sigterm) => {
                    sigterm.recv().await;
                }
                Err(e) => {
                    warn!(error = %e, "SIGTERM handler unavailable, stop with Ctrl-C");
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => info!(signal = "SIGINT", "stopping ballot server"),
            _ = terminate => info!(signal = "SIGTERM", "stopping ballot server"),
        }

        self.shutdown();
    }
}

impl Default for ShutdownController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn shutdown_without_server_is_harmless() {
        ShutdownController::new().shutdown();
    }

    #[tokio::test]
    async fn late_subscriber_misses_earlier_stop() {
        let controller = ShutdownController::new();
        let mut early = controller.subscribe();
        controller.shutdown();
        let mut late = controller.subscribe();

        assert!(early.recv().await.is_ok());
        assert!(matches!(
            late.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));
    }
}
