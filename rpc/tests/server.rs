//! The HTTP surface, driven through `tower::ServiceExt::oneshot`.

use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use ballot_ledger_rpc::{LedgerRpc, RpcError};
use ballot_nullables::{NullLedger, NullProposalFeed};
use ballot_rpc::{router, AppState, LedgerProposalStore, RpcServer, ServerMetrics, ShutdownController};
use ballot_simulation::SimulationClient;
use ballot_types::{ContractId, NetworkId, Proposal, ScVal};
use ballot_wallet_core::ProposalFeed;

const CONTRACT: &str = "CAUYK67YNHDL4772UCM6NCTMHLEB7B3WCP637OARYEJGJJV75DBYCTYC";

fn app_with(ledger: Arc<NullLedger>, feed: Arc<dyn ProposalFeed>) -> Router {
    let simulation = SimulationClient::new(ledger as Arc<dyn LedgerRpc>, NetworkId::Testnet);
    router(Arc::new(AppState {
        simulation,
        proposals: feed,
        metrics: Arc::new(ServerMetrics::new().unwrap()),
    }))
}

fn app(ledger: Arc<NullLedger>) -> Router {
    app_with(ledger, Arc::new(NullProposalFeed::default()))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn proposal_value(id: u64, title: &str, yes: u64) -> ScVal {
    ScVal::Map(vec![
        (ScVal::Symbol("id".into()), ScVal::U64(id)),
        (ScVal::Symbol("title".into()), ScVal::String(title.into())),
        (ScVal::Symbol("description".into()), ScVal::String(String::new())),
        (ScVal::Symbol("is_active".into()), ScVal::Bool(true)),
        (ScVal::Symbol("yes_votes".into()), ScVal::U64(yes)),
        (ScVal::Symbol("no_votes".into()), ScVal::U64(0)),
    ])
}

#[tokio::test]
async fn root_reports_liveness() {
    let (status, body) = send(
        app(Arc::new(NullLedger::new(NetworkId::Testnet))),
        Request::get("/").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("running"));
}

#[tokio::test]
async fn simulate_returns_native_result() {
    let ledger = Arc::new(NullLedger::new(NetworkId::Testnet));
    ledger.push_simulation_value(&proposal_value(1, "Bike lanes", 4));

    let (status, body) = send(
        app(ledger),
        post_json(
            "/simulate",
            json!({
                "contractId": CONTRACT,
                "functionName": "view_proposal",
                "params": [{"type": "u64", "value": "1"}]
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["result"]["title"], "Bike lanes");
    assert_eq!(body["result"]["yes_votes"], 4);
}

#[tokio::test]
async fn simulate_without_function_is_400() {
    let ledger = Arc::new(NullLedger::new(NetworkId::Testnet));
    let (status, body) = send(
        app(ledger.clone()),
        post_json("/simulate", json!({"contractId": CONTRACT})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("functionName"));
    assert_eq!(ledger.call_count(), 0);
}

async fn assert_simulate_body_rejected(request: Request<Body>) {
    let ledger = Arc::new(NullLedger::new(NetworkId::Testnet));
    let (status, body) = send(app(ledger.clone()), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert!(body["error"].is_string());
    assert_eq!(ledger.call_count(), 0);
}

#[tokio::test]
async fn simulate_without_json_content_type_is_400() {
    let body = json!({"contractId": CONTRACT, "functionName": "f"}).to_string();
    assert_simulate_body_rejected(Request::post("/simulate").body(Body::from(body)).unwrap()).await;
}

#[tokio::test]
async fn simulate_with_mistyped_field_is_400() {
    assert_simulate_body_rejected(post_json(
        "/simulate",
        json!({"contractId": CONTRACT, "functionName": 5}),
    ))
    .await;
}

#[tokio::test]
async fn simulate_with_empty_body_is_400() {
    assert_simulate_body_rejected(
        Request::post("/simulate")
            .header("content-type", "application/json")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
}

#[tokio::test]
async fn simulate_with_bad_contract_is_400() {
    let (status, _) = send(
        app(Arc::new(NullLedger::new(NetworkId::Testnet))),
        post_json(
            "/simulate",
            json!({"contractId": "not-a-contract", "functionName": "f"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn simulation_failure_is_500_with_diagnostic() {
    let ledger = Arc::new(NullLedger::new(NetworkId::Testnet));
    ledger.push_simulation_error("HostError: Error(Contract, #1)");
    let (status, body) = send(
        app(ledger),
        post_json(
            "/simulate",
            json!({"contractId": CONTRACT, "functionName": "view_proposal"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert!(body["error"].as_str().unwrap().contains("Error(Contract, #1)"));
}

#[tokio::test]
async fn node_outage_is_500() {
    let ledger = Arc::new(NullLedger::new(NetworkId::Testnet));
    ledger.push_simulation(Err(RpcError::Http(503)));
    let (status, _) = send(
        app(ledger),
        post_json(
            "/simulate",
            json!({"contractId": CONTRACT, "functionName": "view_proposal"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn proposals_come_from_the_feed() {
    let feed = Arc::new(NullProposalFeed::new(vec![Proposal {
        id: 1,
        title: "Library hours".into(),
        description: String::new(),
        is_active: true,
        yes_votes: 0,
        no_votes: 2,
    }]));
    let (status, body) = send(
        app_with(Arc::new(NullLedger::new(NetworkId::Testnet)), feed),
        Request::get("/api/proposals").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["proposals"][0]["no_votes"], 2);
}

#[tokio::test]
async fn failing_feed_is_500_unsuccessful() {
    let feed = Arc::new(NullProposalFeed::default());
    feed.set_failing(true);
    let (status, body) = send(
        app_with(Arc::new(NullLedger::new(NetworkId::Testnet)), feed),
        Request::get("/api/proposals").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn metrics_count_requests() {
    let ledger = Arc::new(NullLedger::new(NetworkId::Testnet));
    let app = app(ledger);
    send(
        app.clone(),
        post_json("/simulate", json!({"contractId": CONTRACT, "functionName": "f"})),
    )
    .await;
    let (status, body) = send(app, Request::get("/metrics").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("ballot_simulate_requests_total 1"));
}

#[tokio::test]
async fn ledger_store_reads_until_sentinel() {
    let ledger = Arc::new(NullLedger::new(NetworkId::Testnet));
    ledger.push_simulation_value(&proposal_value(1, "Bike lanes", 4));
    ledger.push_simulation_value(&proposal_value(2, "Library hours", 1));
    ledger.push_simulation_value(&proposal_value(0, "", 0));

    let simulation = SimulationClient::new(ledger.clone() as Arc<dyn LedgerRpc>, NetworkId::Testnet);
    let store = LedgerProposalStore::new(simulation, ContractId::parse(CONTRACT).unwrap());
    let proposals = store.fetch_proposals().await.unwrap();

    assert_eq!(proposals.len(), 2);
    assert_eq!(proposals[1].title, "Library hours");
    assert_eq!(ledger.call_count(), 3);
}

fn untitled_proposal_value(id: u64, yes: u64, no: u64) -> ScVal {
    ScVal::Map(vec![
        (ScVal::Symbol("id".into()), ScVal::U64(id)),
        (ScVal::Symbol("is_active".into()), ScVal::Bool(true)),
        (ScVal::Symbol("no_votes".into()), ScVal::U64(no)),
        (ScVal::Symbol("yes_votes".into()), ScVal::U64(yes)),
    ])
}

#[tokio::test]
async fn ledger_store_reads_proposals_without_text() {
    let ledger = Arc::new(NullLedger::new(NetworkId::Testnet));
    ledger.push_simulation_value(&untitled_proposal_value(1, 2, 1));
    ledger.push_simulation_value(&untitled_proposal_value(0, 0, 0));

    let simulation = SimulationClient::new(ledger as Arc<dyn LedgerRpc>, NetworkId::Testnet);
    let store = LedgerProposalStore::new(simulation, ContractId::parse(CONTRACT).unwrap());
    let proposals = store.fetch_proposals().await.unwrap();

    assert_eq!(proposals.len(), 1);
    assert_eq!(proposals[0].id, 1);
    assert_eq!(proposals[0].title, "");
    assert_eq!(proposals[0].yes_votes, 2);
    assert_eq!(proposals[0].no_votes, 1);
}

#[tokio::test]
async fn untitled_proposals_list_over_http() {
    let ledger = Arc::new(NullLedger::new(NetworkId::Testnet));
    ledger.push_simulation_value(&untitled_proposal_value(1, 3, 0));
    ledger.push_simulation_value(&untitled_proposal_value(0, 0, 0));

    let simulation = SimulationClient::new(ledger.clone() as Arc<dyn LedgerRpc>, NetworkId::Testnet);
    let store = LedgerProposalStore::new(simulation, ContractId::parse(CONTRACT).unwrap());
    let (status, body) = send(
        app_with(ledger, Arc::new(store)),
        Request::get("/api/proposals").body(Body::empty()).unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["proposals"][0]["id"], 1);
    assert_eq!(body["proposals"][0]["yes_votes"], 3);
}

#[tokio::test]
async fn ledger_store_respects_maximum() {
    let ledger = Arc::new(NullLedger::new(NetworkId::Testnet));
    for id in 1..=5 {
        ledger.push_simulation_value(&proposal_value(id, "p", 0));
    }
    let simulation = SimulationClient::new(ledger.clone() as Arc<dyn LedgerRpc>, NetworkId::Testnet);
    let store = LedgerProposalStore::new(simulation, ContractId::parse(CONTRACT).unwrap())
        .with_max_proposals(3);
    assert_eq!(store.fetch_proposals().await.unwrap().len(), 3);
    assert_eq!(ledger.call_count(), 3);
}

#[tokio::test]
async fn ledger_store_surfaces_contract_errors() {
    let ledger = Arc::new(NullLedger::new(NetworkId::Testnet));
    ledger.push_simulation_error("storage missing");
    let simulation = SimulationClient::new(ledger as Arc<dyn LedgerRpc>, NetworkId::Testnet);
    let store = LedgerProposalStore::new(simulation, ContractId::parse(CONTRACT).unwrap());
    assert!(store.fetch_proposals().await.is_err());
}

#[tokio::test]
async fn server_stops_on_shutdown() {
    let ledger = Arc::new(NullLedger::new(NetworkId::Testnet));
    let simulation = SimulationClient::new(ledger as Arc<dyn LedgerRpc>, NetworkId::Testnet);
    let state = Arc::new(AppState {
        simulation,
        proposals: Arc::new(NullProposalFeed::default()),
        metrics: Arc::new(ServerMetrics::new().unwrap()),
    });
    let controller = ShutdownController::new();
    let rx = controller.subscribe();
    let server = tokio::spawn(async move { RpcServer::new(0, state).start(rx).await });

    tokio::time::sleep(Duration::from_millis(50)).await;
    controller.shutdown();

    let stopped = tokio::time::timeout(Duration::from_secs(5), server)
        .await
        .expect("server did not stop")
        .unwrap();
    assert!(stopped.is_ok());
}
