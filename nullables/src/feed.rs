//! Nullable proposal feed.

use async_trait::async_trait;
use ballot_types::Proposal;
use ballot_wallet_core::{FeedError, ProposalFeed};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::lock;

#[derive(Default)]
pub struct NullProposalFeed {
    proposals: Mutex<Vec<Proposal>>,
    failing: AtomicBool,
    fetches: AtomicUsize,
}

impl NullProposalFeed {
    pub fn new(proposals: Vec<Proposal>) -> Self {
        Self {
            proposals: Mutex::new(proposals),
            ..Default::default()
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn set_proposals(&self, proposals: Vec<Proposal>) {
        *lock(&self.proposals) = proposals;
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProposalFeed for NullProposalFeed {
    async fn fetch_proposals(&self) -> Result<Vec<Proposal>, FeedError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(FeedError::Unsuccessful("feed unavailable".to_string()));
        }
        Ok(lock(&self.proposals).clone())
    }
}
