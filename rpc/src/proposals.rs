//! Proposal listing straight from the voting contract.

use async_trait::async_trait;
use ballot_simulation::SimulationClient;
use ballot_transactions::{view_proposal_args, VIEW_PROPOSAL_FN};
use ballot_types::{ContractId, Proposal, ReturnValue, SimulationResult};
use ballot_wallet_core::{FeedError, ProposalFeed};
use tracing::debug;

/// Upper bound on proposals read per listing.
pub const DEFAULT_MAX_PROPOSALS: u64 = 100;

/// Reads proposals by simulating `view_proposal(1)`, `view_proposal(2)`, ...
/// until the contract answers with its `id == 0` placeholder.
pub struct LedgerProposalStore {
    simulation: SimulationClient,
    contract: ContractId,
    max_proposals: u64,
}

impl LedgerProposalStore {
    pub fn new(simulation: SimulationClient, contract: ContractId) -> Self {
        Self {
            simulation,
            contract,
            max_proposals: DEFAULT_MAX_PROPOSALS,
        }
    }

    pub fn with_max_proposals(mut self, max: u64) -> Self {
        self.max_proposals = max;
        self
    }

    /// `Ok(None)` once past the last proposal.
    async fn view(&self, id: u64) -> Result<Option<Proposal>, FeedError> {
        let result = self
            .simulation
            .simulate(&self.contract, VIEW_PROPOSAL_FN, view_proposal_args(id))
            .await;
        let value = match result {
            SimulationResult::Success(success) => match success.return_value {
                ReturnValue::Value(value) => value,
                ReturnValue::NoValue => return Ok(None),
            },
            SimulationResult::Error(failure) => {
                return Err(FeedError::Unsuccessful(failure.diagnostic));
            }
        };
        let proposal: Proposal = serde_json::from_value(value.to_native())
            .map_err(|e| FeedError::Malformed(format!("proposal {id}: {e}")))?;
        Ok((!proposal.is_sentinel()).then_some(proposal))
    }
}

#[async_trait]
impl ProposalFeed for LedgerProposalStore {
    async fn fetch_proposals(&self) -> Result<Vec<Proposal>, FeedError> {
        let mut proposals = Vec::new();
        for id in 1..=self.max_proposals {
            match self.view(id).await? {
                Some(proposal) => proposals.push(proposal),
                None => break,
            }
        }
        debug!(count = proposals.len(), "read proposals from contract");
        Ok(proposals)
    }
}
