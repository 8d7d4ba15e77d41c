//! `SimulationClient` against the nullable ledger.

use std::sync::Arc;

use ballot_ledger_rpc::{LedgerRpc, RpcError};
use ballot_nullables::{LedgerCall, NullLedger};
use ballot_simulation::{SimulationClient, SIMULATION_FEE};
use ballot_types::{ContractId, NetworkId, Operation, ReturnValue, ScVal, SimulationResult};

const CONTRACT: &str = "CAUYK67YNHDL4772UCM6NCTMHLEB7B3WCP637OARYEJGJJV75DBYCTYC";

fn client() -> (Arc<NullLedger>, SimulationClient) {
    let ledger = Arc::new(NullLedger::new(NetworkId::Testnet));
    let client = SimulationClient::new(ledger.clone() as Arc<dyn LedgerRpc>, NetworkId::Testnet);
    (ledger, client)
}

fn contract() -> ContractId {
    ContractId::parse(CONTRACT).unwrap()
}

#[tokio::test]
async fn decodes_return_value() {
    let (ledger, client) = client();
    let proposal = ScVal::Map(vec![(ScVal::Symbol("id".into()), ScVal::U64(1))]);
    ledger.push_simulation_value(&proposal);

    let result = client
        .simulate(&contract(), "view_proposal", vec![ScVal::U64(1)])
        .await;
    match result {
        SimulationResult::Success(success) => {
            assert_eq!(success.return_value, ReturnValue::Value(proposal));
            assert_eq!(success.min_resource_fee, 1000);
        }
        SimulationResult::Error(e) => panic!("unexpected failure: {}", e.diagnostic),
    }
}

#[tokio::test]
async fn void_call_is_no_value() {
    let (_, client) = client();
    let result = client.simulate(&contract(), "cast_vote", Vec::new()).await;
    assert!(matches!(
        result,
        SimulationResult::Success(ref s) if s.return_value == ReturnValue::NoValue
    ));
}

#[tokio::test]
async fn transport_failure_becomes_error_value() {
    let (ledger, client) = client();
    ledger.push_simulation(Err(RpcError::Transport("connection refused".into())));
    let result = client.simulate(&contract(), "view_proposal", Vec::new()).await;
    match result {
        SimulationResult::Error(e) => assert!(e.diagnostic.starts_with("transport:")),
        SimulationResult::Success(_) => panic!("expected an error"),
    }
}

#[tokio::test]
async fn contract_error_passes_diagnostic_through() {
    let (ledger, client) = client();
    ledger.push_simulation_error("HostError: Error(Contract, #3)");
    let result = client.simulate(&contract(), "cast_vote", Vec::new()).await;
    assert!(matches!(
        result,
        SimulationResult::Error(ref e) if e.diagnostic == "HostError: Error(Contract, #3)"
    ));
}

#[tokio::test]
async fn invalid_function_name_never_reaches_the_node() {
    let (ledger, client) = client();
    let result = client.simulate(&contract(), "not a symbol", Vec::new()).await;
    assert!(!result.is_success());
    assert_eq!(ledger.call_count(), 0);
}

#[tokio::test]
async fn each_simulation_uses_a_fresh_source() {
    let (ledger, client) = client();
    client.simulate(&contract(), "view_proposal", vec![ScVal::U64(1)]).await;
    client.simulate(&contract(), "view_proposal", vec![ScVal::U64(1)]).await;

    let envelopes: Vec<_> = ledger
        .calls()
        .into_iter()
        .filter_map(|c| match c {
            LedgerCall::Simulate(envelope) => Some(envelope),
            _ => None,
        })
        .collect();
    assert_eq!(envelopes.len(), 2);
    assert_ne!(envelopes[0].tx.source, envelopes[1].tx.source);
    for envelope in &envelopes {
        assert_eq!(envelope.tx.fee, SIMULATION_FEE);
        assert_eq!(envelope.tx.sequence, 1);
        assert!(envelope.signatures.is_empty());
        let Operation::InvokeContract(op) = &envelope.tx.operations[0];
        assert_eq!(op.function, "view_proposal");
        assert_eq!(op.args, vec![ScVal::U64(1)]);
    }
}
