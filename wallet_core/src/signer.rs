//! The external signer boundary and its readiness signal.

use async_trait::async_trait;
use ballot_types::{AccountId, NetworkId};
use std::time::Duration;
use tokio::sync::watch;

use crate::error::SignerError;

/// Network binding passed along with every signing request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignOptions {
    /// Signer-facing network name, e.g. `TESTNET`.
    pub network: String,
    pub network_passphrase: String,
}

impl SignOptions {
    pub fn for_network(network: NetworkId) -> Self {
        Self {
            network: network.signer_name().to_string(),
            network_passphrase: network.passphrase().to_string(),
        }
    }
}

/// A component holding the voter's key. The orchestrator never sees key
/// material; it only exchanges wire envelopes with the signer.
#[async_trait]
pub trait Signer: Send + Sync {
    async fn is_ready(&self) -> bool;

    /// Fails when the signer is locked or absent.
    async fn public_key(&self) -> Result<AccountId, SignerError>;

    /// Sign a wire envelope, returning the signed wire envelope.
    async fn sign_transaction(
        &self,
        wire: &str,
        options: &SignOptions,
    ) -> Result<String, SignerError>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Readiness {
    Pending,
    Ready,
    Unavailable,
}

/// Signals signer readiness to every [`SignerReadiness`] handle.
///
/// Dropping the notifier without signalling resolves all waiters as
/// [`Readiness::Unavailable`].
#[derive(Debug)]
pub struct ReadinessNotifier {
    tx: watch::Sender<Readiness>,
}

impl ReadinessNotifier {
    pub fn ready(self) {
        self.tx.send_replace(Readiness::Ready);
    }

    pub fn unavailable(self) {
        self.tx.send_replace(Readiness::Unavailable);
    }
}

impl Drop for ReadinessNotifier {
    fn drop(&mut self) {
        if *self.tx.borrow() == Readiness::Pending {
            self.tx.send_replace(Readiness::Unavailable);
        }
    }
}

/// An awaitable view of signer readiness, owned by the vote host.
#[derive(Clone, Debug)]
pub struct SignerReadiness {
    rx: watch::Receiver<Readiness>,
}

impl SignerReadiness {
    /// A pending readiness handle and the notifier that resolves it.
    pub fn channel() -> (ReadinessNotifier, Self) {
        let (tx, rx) = watch::channel(Readiness::Pending);
        (ReadinessNotifier { tx }, Self { rx })
    }

    /// A handle that is ready from the start.
    pub fn ready() -> Self {
        let (notifier, readiness) = Self::channel();
        notifier.ready();
        readiness
    }

    pub fn current(&self) -> Readiness {
        *self.rx.borrow()
    }

    /// Wait up to `timeout` for readiness to resolve. Returns
    /// [`Readiness::Pending`] if it has not resolved in time.
    pub async fn wait_ready(&self, timeout: Duration) -> Readiness {
        let mut rx = self.rx.clone();
        let resolved = async move {
            loop {
                let state = *rx.borrow_and_update();
                if state != Readiness::Pending {
                    return state;
                }
                if rx.changed().await.is_err() {
                    return Readiness::Unavailable;
                }
            }
        };
        tokio::time::timeout(timeout, resolved)
            .await
            .unwrap_or(Readiness::Pending)
    }
}
