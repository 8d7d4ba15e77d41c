//! HTTP server error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use ballot_wallet_core::ProposalsResponse;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("Simulation failed: {0}")]
    Simulation(String),

    #[error("proposal store error: {0}")]
    ProposalStore(String),

    #[error("metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    #[error("server error: {0}")]
    Server(String),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            Self::ProposalStore(message) => {
                (status, Json(ProposalsResponse::failed(message))).into_response()
            }
            Self::InvalidRequest(message) => (status, Json(json!({ "error": message }))).into_response(),
            other => (status, Json(json!({ "error": other.to_string() }))).into_response(),
        }
    }
}

impl From<std::io::Error> for ServerError {
    fn from(e: std::io::Error) -> Self {
        Self::Server(e.to_string())
    }
}
