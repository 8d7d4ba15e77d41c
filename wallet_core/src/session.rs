//! The vote host: readiness, connection and vote forwarding.

use std::sync::Arc;
use std::time::Duration;

use ballot_types::AccountId;
use tokio::sync::{broadcast, RwLock};
use tracing::info;

use crate::error::{SignerError, VoteError};
use crate::orchestrator::{AttemptUpdate, VoteOrchestrator, VoteReceipt};
use crate::signer::{Readiness, SignerReadiness};

/// Owns one orchestrator, the signer readiness handle and the connected key.
///
/// A session starts disconnected. [`connect`](Self::connect) waits for the
/// signer to become ready and then asks it for the public key; until that
/// succeeds every vote fails its precondition check.
pub struct VoteSession {
    orchestrator: Arc<VoteOrchestrator>,
    readiness: SignerReadiness,
    connected: RwLock<Option<AccountId>>,
}

impl VoteSession {
    pub fn new(orchestrator: Arc<VoteOrchestrator>, readiness: SignerReadiness) -> Self {
        Self {
            orchestrator,
            readiness,
            connected: RwLock::new(None),
        }
    }

    pub fn readiness(&self) -> Readiness {
        self.readiness.current()
    }

    /// Wait up to `timeout` for the signer, then fetch its public key.
    pub async fn connect(&self, timeout: Duration) -> Result<AccountId, SignerError> {
        match self.readiness.wait_ready(timeout).await {
            Readiness::Ready => {}
            Readiness::Pending => return Err(SignerError::Timeout(timeout)),
            Readiness::Unavailable => return Err(SignerError::Unavailable),
        }
        let key = self.orchestrator.signer().public_key().await?;
        info!(account = %key.abbreviated(), "signer connected");
        *self.connected.write().await = Some(key.clone());
        Ok(key)
    }

    pub async fn disconnect(&self) {
        self.connected.write().await.take();
    }

    pub async fn connected(&self) -> Option<AccountId> {
        self.connected.read().await.clone()
    }

    /// Vote with the connected key, or fail the precondition if none.
    pub async fn cast_vote(&self, proposal_id: u64, choice: bool) -> Result<VoteReceipt, VoteError> {
        let voter = self.connected().await;
        self.orchestrator
            .cast_vote(proposal_id, voter.as_ref(), choice)
            .await
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AttemptUpdate> {
        self.orchestrator.subscribe()
    }
}
