//! Request handlers and their DTOs.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use ballot_types::{ContractId, ReturnValue, ScVal, SimulationResult};
use ballot_utils::tracing_spans::http_span;
use ballot_wallet_core::ProposalsResponse;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn, Instrument};

use crate::error::ServerError;
use crate::server::AppState;

// ── Simulate ─────────────────────────────────────────────────────────────

/// Body of `POST /simulate`. Every param is a tagged value,
/// `{"type": "u64", "value": "1"}`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulateRequest {
    pub contract_id: Option<String>,
    pub function_name: Option<String>,
    #[serde(default)]
    pub params: Vec<Value>,
}

#[derive(Debug, Serialize)]
pub struct SimulateResponse {
    /// Native JSON form of the return value; `null` when the call returned
    /// nothing.
    pub result: Value,
}

impl SimulateRequest {
    fn validate(self) -> Result<(ContractId, String, Vec<ScVal>), ServerError> {
        let (Some(contract_id), Some(function_name)) = (
            self.contract_id.filter(|s| !s.is_empty()),
            self.function_name.filter(|s| !s.is_empty()),
        ) else {
            return Err(ServerError::InvalidRequest(
                "contractId and functionName are required.".to_string(),
            ));
        };
        let contract = ContractId::parse(contract_id)
            .map_err(|e| ServerError::InvalidRequest(e.to_string()))?;
        let args = self
            .params
            .iter()
            .enumerate()
            .map(|(i, p)| {
                ScVal::from_tagged(p)
                    .map_err(|e| ServerError::InvalidRequest(format!("params[{i}]: {e}")))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok((contract, function_name, args))
    }
}

/// Any body axum cannot turn into a [`SimulateRequest`] (wrong content
/// type, bad JSON, mistyped field) is a 400 like a missing field.
pub async fn simulate(
    State(state): State<Arc<AppState>>,
    body: Result<Json<SimulateRequest>, JsonRejection>,
) -> Result<Json<SimulateResponse>, ServerError> {
    async move {
        state.metrics.simulate_requests.inc();
        let Json(request) = body.map_err(|e| ServerError::InvalidRequest(e.body_text()))?;
        let (contract, function, args) = request.validate()?;

        let started = Instant::now();
        let result = state.simulation.simulate(&contract, &function, args).await;
        state
            .metrics
            .simulate_latency_ms
            .observe(started.elapsed().as_secs_f64() * 1000.0);

        match result {
            SimulationResult::Success(success) => {
                let result = match success.return_value {
                    ReturnValue::Value(value) => value.to_native(),
                    ReturnValue::NoValue => Value::Null,
                };
                Ok::<_, ServerError>(Json(SimulateResponse { result }))
            }
            SimulationResult::Error(failure) => {
                state.metrics.simulate_failures.inc();
                warn!(diagnostic = %failure.diagnostic, "simulation failed");
                Err(ServerError::Simulation(failure.diagnostic))
            }
        }
    }
    .instrument(http_span("POST", "/simulate"))
    .await
}

// ── Proposals ────────────────────────────────────────────────────────────

pub async fn list_proposals(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ProposalsResponse>, ServerError> {
    async move {
        state.metrics.proposal_requests.inc();
        let proposals = state
            .proposals
            .fetch_proposals()
            .await
            .map_err(|e| ServerError::ProposalStore(e.to_string()))?;
        info!(count = proposals.len(), "listed proposals");
        Ok::<_, ServerError>(Json(ProposalsResponse::ok(proposals)))
    }
    .instrument(http_span("GET", "/api/proposals"))
    .await
}

// ── Misc ─────────────────────────────────────────────────────────────────

pub async fn root() -> &'static str {
    "ballot server running"
}

pub async fn metrics(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ServerError> {
    let text = state.metrics.encode()?;
    Ok(([(header::CONTENT_TYPE, "text/plain; version=0.0.4")], text))
}
