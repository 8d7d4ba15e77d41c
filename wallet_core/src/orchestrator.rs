//! The vote-casting state machine.
//!
//! One call to [`VoteOrchestrator::cast_vote`] is one attempt:
//!
//! ```text
//! Idle → AccountFetched → Built → Simulated → Prepared → Signed → Submitted
//!      → Confirmed | Rejected | TimedOut
//! ```
//!
//! Any earlier failure ends the attempt as `Aborted`. Every attempt fetches
//! the account afresh; nothing carries over between attempts except what the
//! ledger itself records.
//!
//! Transitions are broadcast as [`AttemptUpdate`]s tagged with the proposal
//! id, so concurrent attempts on different proposals stay distinguishable.

use std::sync::Arc;
use std::time::{Duration, Instant};

use ballot_ledger_rpc::LedgerRpc;
use ballot_simulation::classify;
use ballot_transactions::{
    assemble, cast_vote_op, PreparedTransaction, SignedTransaction, TransactionBuilder,
    UnsignedTransaction, DEFAULT_TIMEOUT_SECS,
};
use ballot_types::{
    Account, AccountId, ContractId, NetworkId, Proposal, ScVal, SimulationResult,
    SimulationSuccess, SubmissionOutcome, TxHash,
};
use ballot_utils::format_millis;
use ballot_utils::tracing_spans::{stage_span, vote_span};
use tokio::sync::broadcast;
use tracing::{debug, info, warn, Instrument};

use crate::error::{PreconditionError, SignerError, Stage, VoteError};
use crate::proposals::ProposalFeed;
use crate::signer::{SignOptions, Signer};

/// Updates buffered per subscriber before the oldest are dropped.
pub const ATTEMPT_UPDATE_CAPACITY: usize = 64;

/// Fee bid on vote transactions, in stroops.
pub const DEFAULT_VOTE_FEE: u32 = 100_000;
/// Polling continues this long past the validity window.
pub const POLL_MARGIN_SECS: u64 = 10;
/// How long a human gets to approve a signature.
pub const DEFAULT_SIGN_TIMEOUT: Duration = Duration::from_secs(300);

/// Fixed-interval confirmation polling.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_polls: u32,
}

impl PollPolicy {
    /// Enough polls to cover `timeout_secs` plus [`POLL_MARGIN_SECS`].
    pub fn for_timeout(timeout_secs: u64, interval: Duration) -> Self {
        let window_ms = (timeout_secs + POLL_MARGIN_SECS).saturating_mul(1000) as u128;
        let step_ms = interval.as_millis().max(1);
        let polls = window_ms.div_ceil(step_ms).max(1);
        Self {
            interval,
            max_polls: u32::try_from(polls).unwrap_or(u32::MAX),
        }
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::for_timeout(DEFAULT_TIMEOUT_SECS, Duration::from_secs(1))
    }
}

#[derive(Clone, Debug)]
pub struct OrchestratorConfig {
    pub contract: ContractId,
    pub network: NetworkId,
    pub fee: u32,
    /// Validity window of each vote transaction.
    pub timeout_secs: u64,
    pub poll: PollPolicy,
    pub sign_timeout: Duration,
}

impl OrchestratorConfig {
    pub fn new(contract: ContractId, network: NetworkId) -> Self {
        Self {
            contract,
            network,
            fee: DEFAULT_VOTE_FEE,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            poll: PollPolicy::default(),
            sign_timeout: DEFAULT_SIGN_TIMEOUT,
        }
    }
}

/// Observable progress of the current attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AttemptState {
    Idle,
    AccountFetched { sequence: u64 },
    Built,
    Simulated,
    Prepared,
    Signed { hash: TxHash },
    Submitted { hash: TxHash },
    Confirmed { hash: TxHash, ledger: u32 },
    Rejected { hash: TxHash },
    TimedOut { hash: TxHash },
    Aborted { stage: Option<Stage> },
}

impl AttemptState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Confirmed { .. } | Self::Rejected { .. } | Self::TimedOut { .. } | Self::Aborted { .. }
        )
    }
}

/// One state transition of the attempt voting on `proposal_id`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttemptUpdate {
    pub proposal_id: u64,
    pub state: AttemptState,
}

/// Proof of a confirmed vote.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VoteReceipt {
    pub proposal_id: u64,
    pub choice: bool,
    pub voter: AccountId,
    pub hash: TxHash,
    pub ledger: u32,
    pub return_value: Option<ScVal>,
    /// Number of status polls it took to observe the confirmation.
    pub polls: u32,
    /// Proposal list re-read after confirmation, if the refresh succeeded.
    pub refreshed: Option<Vec<Proposal>>,
}

pub struct VoteOrchestrator {
    ledger: Arc<dyn LedgerRpc>,
    signer: Arc<dyn Signer>,
    feed: Option<Arc<dyn ProposalFeed>>,
    config: OrchestratorConfig,
    updates: broadcast::Sender<AttemptUpdate>,
}

impl VoteOrchestrator {
    pub fn new(
        ledger: Arc<dyn LedgerRpc>,
        signer: Arc<dyn Signer>,
        config: OrchestratorConfig,
    ) -> Self {
        let (updates, _) = broadcast::channel(ATTEMPT_UPDATE_CAPACITY);
        Self {
            ledger,
            signer,
            feed: None,
            config,
            updates,
        }
    }

    /// Refresh this feed once after each confirmed vote.
    pub fn with_proposal_feed(mut self, feed: Arc<dyn ProposalFeed>) -> Self {
        self.feed = Some(feed);
        self
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    pub fn signer(&self) -> &Arc<dyn Signer> {
        &self.signer
    }

    /// Receive every transition of attempts started after subscribing.
    pub fn subscribe(&self) -> broadcast::Receiver<AttemptUpdate> {
        self.updates.subscribe()
    }

    /// Run one full vote attempt.
    ///
    /// Returns exactly one receipt or one error. Without a voter key or a
    /// ready signer the call fails before any network request.
    pub async fn cast_vote(
        &self,
        proposal_id: u64,
        voter: Option<&AccountId>,
        choice: bool,
    ) -> Result<VoteReceipt, VoteError> {
        let span = vote_span(proposal_id, choice);
        async move {
            self.transition(proposal_id, AttemptState::Idle);
            let started = Instant::now();
            let result = self.attempt(proposal_id, voter, choice).await;
            let elapsed = format_millis(started.elapsed());
            match &result {
                Ok(receipt) => {
                    info!(
                        hash = %receipt.hash,
                        ledger = receipt.ledger,
                        polls = receipt.polls,
                        %elapsed,
                        "vote confirmed"
                    );
                }
                Err(e) => {
                    let terminal = match e {
                        VoteError::LedgerRejection { hash, .. } => AttemptState::Rejected { hash: *hash },
                        VoteError::Timeout { hash, .. } => AttemptState::TimedOut { hash: *hash },
                        other => AttemptState::Aborted { stage: other.stage() },
                    };
                    self.transition(proposal_id, terminal);
                    warn!(kind = %e.kind(), error = %e, %elapsed, "vote failed");
                }
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn attempt(
        &self,
        proposal_id: u64,
        voter: Option<&AccountId>,
        choice: bool,
    ) -> Result<VoteReceipt, VoteError> {
        let voter = voter.ok_or(PreconditionError::NotConnected)?;
        if !self.signer.is_ready().await {
            return Err(PreconditionError::SignerUnavailable.into());
        }

        let account = self
            .fetch_account(voter)
            .instrument(stage_span(Stage::AccountFetch.as_str()))
            .await?;
        self.transition(
            proposal_id,
            AttemptState::AccountFetched {
                sequence: account.sequence,
            },
        );

        let unsigned = self.build(&account, proposal_id, choice)?;
        self.transition(proposal_id, AttemptState::Built);

        let simulation = self
            .simulate(&unsigned)
            .instrument(stage_span(Stage::Simulate.as_str()))
            .await?;
        self.transition(proposal_id, AttemptState::Simulated);

        let prepared = assemble(&unsigned, &simulation).map_err(|e| VoteError::Internal {
            stage: Stage::Prepare,
            message: e.to_string(),
        })?;
        self.transition(proposal_id, AttemptState::Prepared);

        let signed = self
            .sign(&prepared, voter)
            .instrument(stage_span(Stage::Sign.as_str()))
            .await?;
        self.transition(
            proposal_id,
            AttemptState::Signed {
                hash: signed.hash(),
            },
        );

        let hash = self
            .submit(&signed)
            .instrument(stage_span(Stage::Submit.as_str()))
            .await?;
        self.transition(proposal_id, AttemptState::Submitted { hash });

        let (ledger, return_value, polls) = self
            .confirm(hash)
            .instrument(stage_span(Stage::Confirm.as_str()))
            .await?;
        self.transition(proposal_id, AttemptState::Confirmed { hash, ledger });

        let refreshed = self.refresh_proposals().await;

        Ok(VoteReceipt {
            proposal_id,
            choice,
            voter: voter.clone(),
            hash,
            ledger,
            return_value,
            polls,
            refreshed,
        })
    }

    async fn fetch_account(&self, voter: &AccountId) -> Result<Account, VoteError> {
        self.ledger
            .get_account(voter)
            .await
            .map_err(|source| VoteError::Transport {
                stage: Stage::AccountFetch,
                source,
            })
    }

    fn build(
        &self,
        account: &Account,
        proposal_id: u64,
        choice: bool,
    ) -> Result<UnsignedTransaction, VoteError> {
        TransactionBuilder::new(account, self.config.fee, self.config.network)
            .add_operation(cast_vote_op(
                &self.config.contract,
                proposal_id,
                choice,
                &account.id,
            ))
            .set_timeout(self.config.timeout_secs)
            .build()
            .map_err(|e| VoteError::Internal {
                stage: Stage::Build,
                message: e.to_string(),
            })
    }

    async fn simulate(&self, unsigned: &UnsignedTransaction) -> Result<SimulationSuccess, VoteError> {
        let response = self
            .ledger
            .simulate_transaction(&unsigned.envelope())
            .await
            .map_err(|source| VoteError::Transport {
                stage: Stage::Simulate,
                source,
            })?;
        match classify(response) {
            SimulationResult::Success(success) => {
                debug!(
                    min_resource_fee = success.min_resource_fee,
                    latest_ledger = success.latest_ledger,
                    "simulation succeeded"
                );
                Ok(success)
            }
            SimulationResult::Error(failure) => Err(VoteError::Simulation {
                diagnostic: failure.diagnostic,
            }),
        }
    }

    async fn sign(
        &self,
        prepared: &PreparedTransaction,
        voter: &AccountId,
    ) -> Result<SignedTransaction, VoteError> {
        let wire = prepared.to_wire().map_err(|e| VoteError::Internal {
            stage: Stage::Sign,
            message: e.to_string(),
        })?;
        let options = SignOptions::for_network(self.config.network);
        let signed_wire = tokio::time::timeout(
            self.config.sign_timeout,
            self.signer.sign_transaction(&wire, &options),
        )
        .await
        .map_err(|_| SignerError::Timeout(self.config.sign_timeout))??;

        let signed = SignedTransaction::from_wire(&signed_wire, self.config.network)
            .map_err(|e| SignerError::Malformed(e.to_string()))?;
        signed
            .ensure_signs(prepared, voter)
            .map_err(|e| SignerError::Malformed(e.to_string()))?;
        Ok(signed)
    }

    async fn submit(&self, signed: &SignedTransaction) -> Result<TxHash, VoteError> {
        let response = self
            .ledger
            .send_transaction(signed.envelope())
            .await
            .map_err(|source| VoteError::Transport {
                stage: Stage::Submit,
                source,
            })?;
        if !response.status.accepted() {
            return Err(VoteError::Submission {
                status: response.status,
                detail: response.error_detail,
            });
        }
        if response.hash != signed.hash() {
            warn!(
                local = %signed.hash(),
                remote = %response.hash,
                "node reported a different transaction hash"
            );
        }
        debug!(hash = %response.hash, status = %response.status, "submitted");
        Ok(response.hash)
    }

    /// Poll until a terminal status or the poll budget runs out. The first
    /// poll is immediate; later polls wait one interval each.
    async fn confirm(&self, hash: TxHash) -> Result<(u32, Option<ScVal>, u32), VoteError> {
        let policy = self.config.poll;
        for poll in 1..=policy.max_polls {
            if poll > 1 {
                tokio::time::sleep(policy.interval).await;
            }
            match self.ledger.get_transaction(&hash).await {
                Ok(SubmissionOutcome::Success {
                    ledger,
                    return_value,
                }) => return Ok((ledger, return_value, poll)),
                Ok(SubmissionOutcome::Failed { reason }) => {
                    return Err(VoteError::LedgerRejection { hash, reason });
                }
                Ok(outcome) => debug!(poll, status = outcome.status_code(), "not final yet"),
                Err(e) => warn!(poll, error = %e, "status poll failed"),
            }
        }
        Err(VoteError::Timeout {
            hash,
            polls: policy.max_polls,
        })
    }

    async fn refresh_proposals(&self) -> Option<Vec<Proposal>> {
        let feed = self.feed.as_ref()?;
        match feed.fetch_proposals().await {
            Ok(proposals) => {
                debug!(count = proposals.len(), "proposal list refreshed");
                Some(proposals)
            }
            Err(e) => {
                warn!(error = %e, "proposal refresh failed");
                None
            }
        }
    }

    fn transition(&self, proposal_id: u64, state: AttemptState) {
        debug!(?state, "attempt state");
        // No subscribers is fine.
        let _ = self.updates.send(AttemptUpdate { proposal_id, state });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_poll_policy_covers_window_plus_margin() {
        let policy = PollPolicy::default();
        assert_eq!(policy.interval, Duration::from_secs(1));
        assert_eq!(policy.max_polls, 40);
    }

    #[test]
    fn poll_count_rounds_up() {
        let policy = PollPolicy::for_timeout(5, Duration::from_millis(400));
        assert_eq!(policy.max_polls, 38);
    }

    #[test]
    fn terminal_states() {
        assert!(AttemptState::Aborted { stage: None }.is_terminal());
        assert!(!AttemptState::Submitted {
            hash: TxHash::ZERO
        }
        .is_terminal());
    }
}
