//! End-to-end vote attempts against the nullable ledger, signer and feed.

use std::sync::Arc;
use std::time::Duration;

use ballot_ledger_rpc::{LedgerRpc, RpcError};
use ballot_nullables::{LedgerCall, NullLedger, NullProposalFeed, NullSigner, SignBehavior};
use ballot_types::{ContractId, NetworkId, Proposal, ScVal, SendStatus, SubmissionOutcome};
use ballot_wallet_core::{
    AttemptState, AttemptUpdate, ErrorKind, OrchestratorConfig, PollPolicy, PreconditionError,
    RetryAdvice, SignerError, Stage, VoteError, VoteOrchestrator,
};
use tokio::sync::broadcast;

const CONTRACT: &str = "CAUYK67YNHDL4772UCM6NCTMHLEB7B3WCP637OARYEJGJJV75DBYCTYC";
const START_SEQUENCE: u64 = 10;

struct Harness {
    ledger: Arc<NullLedger>,
    signer: Arc<NullSigner>,
    feed: Arc<NullProposalFeed>,
    orchestrator: VoteOrchestrator,
}

fn proposal(id: u64, yes: u64) -> Proposal {
    Proposal {
        id,
        title: format!("Proposal {id}"),
        description: String::new(),
        is_active: true,
        yes_votes: yes,
        no_votes: 0,
    }
}

fn harness() -> Harness {
    let signer = Arc::new(NullSigner::from_seed([7u8; 32]));
    let ledger = Arc::new(
        NullLedger::new(NetworkId::Testnet).with_account(signer.account().clone(), START_SEQUENCE),
    );
    let feed = Arc::new(NullProposalFeed::new(vec![proposal(1, 3)]));

    let mut config = OrchestratorConfig::new(ContractId::parse(CONTRACT).unwrap(), NetworkId::Testnet);
    config.poll = PollPolicy {
        interval: Duration::from_millis(1),
        max_polls: 5,
    };
    config.sign_timeout = Duration::from_millis(100);

    let orchestrator = VoteOrchestrator::new(
        ledger.clone() as Arc<dyn LedgerRpc>,
        signer.clone(),
        config,
    )
    .with_proposal_feed(feed.clone());

    Harness {
        ledger,
        signer,
        feed,
        orchestrator,
    }
}

#[tokio::test]
async fn happy_path_produces_receipt() {
    let h = harness();
    let voter = h.signer.account().clone();
    let receipt = h.orchestrator.cast_vote(1, Some(&voter), true).await.unwrap();

    assert_eq!(receipt.proposal_id, 1);
    assert!(receipt.choice);
    assert_eq!(receipt.voter, voter);
    assert_eq!(receipt.polls, 1);
    assert_eq!(receipt.ledger, 101);
    assert_eq!(receipt.refreshed, Some(vec![proposal(1, 3)]));

    let sent = h.ledger.sent_envelopes();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].tx.sequence, START_SEQUENCE + 1);
    assert_eq!(sent[0].tx.fee, 100_000 + 1000);
    assert!(sent[0].tx.soroban_data.is_some());
    assert_eq!(sent[0].signatures.len(), 1);

    let options = h.signer.last_options().unwrap();
    assert_eq!(options.network, "TESTNET");
    assert_eq!(options.network_passphrase, NetworkId::Testnet.passphrase());
}

#[tokio::test]
async fn stages_run_in_order() {
    let h = harness();
    let voter = h.signer.account().clone();
    h.orchestrator.cast_vote(1, Some(&voter), false).await.unwrap();

    let calls = h.ledger.calls();
    assert_eq!(calls.len(), 4);
    assert!(matches!(calls[0], LedgerCall::GetAccount(_)));
    assert!(matches!(calls[1], LedgerCall::Simulate(_)));
    assert!(matches!(calls[2], LedgerCall::Send(_)));
    assert!(matches!(calls[3], LedgerCall::GetTransaction(_)));
}

#[tokio::test]
async fn scenario_a_no_key_makes_no_calls() {
    let h = harness();
    let err = h.orchestrator.cast_vote(1, None, true).await.unwrap_err();

    assert!(matches!(err, VoteError::Precondition(PreconditionError::NotConnected)));
    assert_eq!(err.kind(), ErrorKind::Precondition);
    assert_eq!(err.retry_advice(), RetryAdvice::FixSetup);
    assert_eq!(h.ledger.call_count(), 0);
    assert_eq!(h.signer.sign_calls(), 0);
}

#[tokio::test]
async fn unready_signer_fails_before_network() {
    let h = harness();
    h.signer.set_ready(false);
    let voter = h.signer.account().clone();
    let err = h.orchestrator.cast_vote(1, Some(&voter), true).await.unwrap_err();

    assert!(matches!(
        err,
        VoteError::Precondition(PreconditionError::SignerUnavailable)
    ));
    assert_eq!(h.ledger.call_count(), 0);
}

#[tokio::test]
async fn scenario_b_simulation_error_skips_signer() {
    let h = harness();
    h.ledger.push_simulation_error("HostError: proposal 42 is closed");
    let voter = h.signer.account().clone();
    let err = h.orchestrator.cast_vote(42, Some(&voter), true).await.unwrap_err();

    match &err {
        VoteError::Simulation { diagnostic } => assert!(diagnostic.contains("proposal 42")),
        other => panic!("expected simulation error, got {other:?}"),
    }
    assert_eq!(err.retry_advice(), RetryAdvice::DoNotRetry);
    assert_eq!(h.signer.sign_calls(), 0);
    assert!(h.ledger.sent_envelopes().is_empty());
}

#[tokio::test]
async fn scenario_c_declined_signature_broadcasts_nothing() {
    let h = harness();
    h.signer.set_behavior(SignBehavior::Decline("user rejected".into()));
    let voter = h.signer.account().clone();
    let err = h.orchestrator.cast_vote(1, Some(&voter), true).await.unwrap_err();

    assert!(matches!(err, VoteError::Signing(SignerError::Declined(_))));
    assert_eq!(err.retry_advice(), RetryAdvice::Reprompt);
    assert!(h.ledger.sent_envelopes().is_empty());
    assert_eq!(h.ledger.sequence_of(&voter), Some(START_SEQUENCE));
}

#[tokio::test]
async fn scenario_d_confirmation_after_not_found_refreshes_once() {
    let h = harness();
    for _ in 0..3 {
        h.ledger.push_status(Ok(SubmissionOutcome::NotFound));
    }
    h.ledger.push_status(Ok(SubmissionOutcome::Success {
        ledger: 205,
        return_value: Some(ScVal::Bool(true)),
    }));
    let voter = h.signer.account().clone();
    let receipt = h.orchestrator.cast_vote(1, Some(&voter), true).await.unwrap();

    assert_eq!(receipt.polls, 4);
    assert_eq!(receipt.ledger, 205);
    assert_eq!(receipt.return_value, Some(ScVal::Bool(true)));
    assert_eq!(h.ledger.status_polls(), 4);
    assert_eq!(h.feed.fetches(), 1);
}

#[tokio::test]
async fn scenario_e_ledger_rejection_skips_refresh() {
    let h = harness();
    h.ledger.push_status(Ok(SubmissionOutcome::Failed {
        reason: "txFAILED".into(),
    }));
    let voter = h.signer.account().clone();
    let err = h.orchestrator.cast_vote(1, Some(&voter), true).await.unwrap_err();

    assert!(matches!(err, VoteError::LedgerRejection { ref reason, .. } if reason == "txFAILED"));
    assert!(err.hash().is_some());
    assert_eq!(h.feed.fetches(), 0);
    assert_eq!(h.ledger.status_polls(), 1);
}

#[tokio::test]
async fn second_vote_uses_advanced_sequence() {
    let h = harness();
    let voter = h.signer.account().clone();
    h.orchestrator.cast_vote(1, Some(&voter), true).await.unwrap();
    h.orchestrator.cast_vote(1, Some(&voter), true).await.unwrap();

    let sent = h.ledger.sent_envelopes();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].tx.sequence, START_SEQUENCE + 1);
    assert_eq!(sent[1].tx.sequence, START_SEQUENCE + 2);
    assert_ne!(sent[0], sent[1]);
    assert_eq!(h.ledger.sequence_of(&voter), Some(START_SEQUENCE + 2));
}

#[tokio::test]
async fn polling_stops_at_first_terminal_status() {
    let h = harness();
    h.ledger.push_status(Ok(SubmissionOutcome::Pending));
    h.ledger.push_status(Ok(SubmissionOutcome::Success {
        ledger: 150,
        return_value: None,
    }));
    h.ledger.push_status(Ok(SubmissionOutcome::Failed {
        reason: "never read".into(),
    }));
    let voter = h.signer.account().clone();
    let receipt = h.orchestrator.cast_vote(1, Some(&voter), true).await.unwrap();

    assert_eq!(receipt.polls, 2);
    assert_eq!(h.ledger.status_polls(), 2);
}

#[tokio::test]
async fn unconfirmed_transaction_times_out() {
    let h = harness();
    for _ in 0..5 {
        h.ledger.push_status(Ok(SubmissionOutcome::NotFound));
    }
    let voter = h.signer.account().clone();
    let err = h.orchestrator.cast_vote(1, Some(&voter), true).await.unwrap_err();

    assert!(matches!(err, VoteError::Timeout { polls: 5, .. }));
    assert_eq!(err.retry_advice(), RetryAdvice::CheckStatus);
    assert_eq!(h.ledger.status_polls(), 5);
    assert_eq!(h.feed.fetches(), 0);
}

#[tokio::test]
async fn poll_transport_errors_are_tolerated() {
    let h = harness();
    h.ledger
        .push_status(Err(RpcError::Transport("connection reset".into())));
    let voter = h.signer.account().clone();
    let receipt = h.orchestrator.cast_vote(1, Some(&voter), true).await.unwrap();
    assert_eq!(receipt.polls, 2);
}

#[tokio::test]
async fn congested_node_is_a_submission_error() {
    let h = harness();
    h.ledger.push_send_status(SendStatus::TryAgainLater);
    let voter = h.signer.account().clone();
    let err = h.orchestrator.cast_vote(1, Some(&voter), true).await.unwrap_err();

    assert!(matches!(
        err,
        VoteError::Submission {
            status: SendStatus::TryAgainLater,
            ..
        }
    ));
    assert_eq!(err.retry_advice(), RetryAdvice::RetryAttempt);
    assert_eq!(h.ledger.status_polls(), 0);
}

#[tokio::test]
async fn missing_account_is_a_transport_error() {
    let h = harness();
    let stranger = NullSigner::from_seed([9u8; 32]);
    let err = h
        .orchestrator
        .cast_vote(1, Some(stranger.account()), true)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        VoteError::Transport {
            stage: Stage::AccountFetch,
            source: RpcError::AccountNotFound(_),
        }
    ));
}

#[tokio::test]
async fn simulate_transport_failure_is_tagged_with_stage() {
    let h = harness();
    h.ledger.push_simulation(Err(RpcError::Http(503)));
    let voter = h.signer.account().clone();
    let err = h.orchestrator.cast_vote(1, Some(&voter), true).await.unwrap_err();
    assert_eq!(err.stage(), Some(Stage::Simulate));
    assert_eq!(err.kind(), ErrorKind::Transport);
}

#[tokio::test]
async fn garbage_from_signer_is_rejected() {
    let h = harness();
    h.signer.set_behavior(SignBehavior::Garbage);
    let voter = h.signer.account().clone();
    let err = h.orchestrator.cast_vote(1, Some(&voter), true).await.unwrap_err();
    assert!(matches!(err, VoteError::Signing(SignerError::Malformed(_))));
    assert!(h.ledger.sent_envelopes().is_empty());
}

#[tokio::test]
async fn signature_from_another_key_is_rejected() {
    let h = harness();
    h.signer.set_behavior(SignBehavior::WrongKey);
    let voter = h.signer.account().clone();
    let err = h.orchestrator.cast_vote(1, Some(&voter), true).await.unwrap_err();
    assert!(matches!(err, VoteError::Signing(SignerError::Malformed(_))));
    assert!(h.ledger.sent_envelopes().is_empty());
}

#[tokio::test]
async fn stalled_signer_times_out() {
    let h = harness();
    h.signer.set_behavior(SignBehavior::Stall(Duration::from_secs(5)));
    let voter = h.signer.account().clone();
    let err = h.orchestrator.cast_vote(1, Some(&voter), true).await.unwrap_err();
    assert!(matches!(err, VoteError::Signing(SignerError::Timeout(_))));
}

#[tokio::test]
async fn failed_refresh_does_not_fail_the_vote() {
    let h = harness();
    h.feed.set_failing(true);
    let voter = h.signer.account().clone();
    let receipt = h.orchestrator.cast_vote(1, Some(&voter), true).await.unwrap();
    assert_eq!(receipt.refreshed, None);
    assert_eq!(h.feed.fetches(), 1);
}

fn drain(rx: &mut broadcast::Receiver<AttemptUpdate>) -> Vec<AttemptUpdate> {
    let mut updates = Vec::new();
    while let Ok(update) = rx.try_recv() {
        updates.push(update);
    }
    updates
}

fn states_for(updates: &[AttemptUpdate], proposal_id: u64) -> Vec<AttemptState> {
    updates
        .iter()
        .filter(|u| u.proposal_id == proposal_id)
        .map(|u| u.state.clone())
        .collect()
}

#[tokio::test]
async fn updates_report_terminal_states() {
    let h = harness();
    let mut rx = h.orchestrator.subscribe();

    let voter = h.signer.account().clone();
    let receipt = h.orchestrator.cast_vote(1, Some(&voter), true).await.unwrap();
    let states = states_for(&drain(&mut rx), 1);
    assert_eq!(states.first(), Some(&AttemptState::Idle));
    assert_eq!(
        states.last(),
        Some(&AttemptState::Confirmed {
            hash: receipt.hash,
            ledger: receipt.ledger
        })
    );

    h.ledger.push_simulation_error("closed");
    h.orchestrator.cast_vote(1, Some(&voter), true).await.unwrap_err();
    let states = states_for(&drain(&mut rx), 1);
    assert_eq!(
        states.last(),
        Some(&AttemptState::Aborted {
            stage: Some(Stage::Simulate)
        })
    );
}

#[tokio::test]
async fn concurrent_attempts_are_told_apart_by_proposal() {
    let h = harness();
    let mut rx = h.orchestrator.subscribe();
    let voter = h.signer.account().clone();

    let (first, second) = tokio::join!(
        h.orchestrator.cast_vote(1, Some(&voter), true),
        h.orchestrator.cast_vote(2, Some(&voter), false),
    );
    let (first, second) = (first.unwrap(), second.unwrap());
    assert_ne!(first.hash, second.hash);

    let updates = drain(&mut rx);
    for (proposal_id, receipt) in [(1, &first), (2, &second)] {
        let states = states_for(&updates, proposal_id);
        assert_eq!(states.first(), Some(&AttemptState::Idle));
        assert!(states.contains(&AttemptState::Submitted { hash: receipt.hash }));
        assert_eq!(
            states.last(),
            Some(&AttemptState::Confirmed {
                hash: receipt.hash,
                ledger: receipt.ledger
            })
        );
        assert_eq!(states.iter().filter(|s| s.is_terminal()).count(), 1);
    }
}

#[tokio::test]
async fn every_kind_has_a_distinct_message() {
    let h = harness();
    let voter = h.signer.account().clone();

    let precondition = h.orchestrator.cast_vote(1, None, true).await.unwrap_err();
    h.ledger.push_simulation_error("closed");
    let simulation = h.orchestrator.cast_vote(1, Some(&voter), true).await.unwrap_err();
    h.signer.set_behavior(SignBehavior::Decline("no".into()));
    let signing = h.orchestrator.cast_vote(1, Some(&voter), true).await.unwrap_err();

    let messages = [
        precondition.user_message(),
        simulation.user_message(),
        signing.user_message(),
    ];
    assert_ne!(messages[0], messages[1]);
    assert_ne!(messages[1], messages[2]);
    assert_ne!(messages[0], messages[2]);
}
