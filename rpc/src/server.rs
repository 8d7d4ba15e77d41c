//! Axum-based HTTP server.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use ballot_simulation::SimulationClient;
use ballot_wallet_core::ProposalFeed;
use tokio::sync::broadcast;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::error::ServerError;
use crate::handlers;
use crate::metrics::ServerMetrics;

/// Shared state behind every handler.
pub struct AppState {
    pub simulation: SimulationClient,
    pub proposals: Arc<dyn ProposalFeed>,
    pub metrics: Arc<ServerMetrics>,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/simulate", post(handlers::simulate))
        .route("/api/proposals", get(handlers::list_proposals))
        .route("/metrics", get(handlers::metrics))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub struct RpcServer {
    pub port: u16,
    pub state: Arc<AppState>,
}

impl RpcServer {
    pub fn new(port: u16, state: Arc<AppState>) -> Self {
        Self { port, state }
    }

    /// Serve until `shutdown` fires.
    pub async fn start(&self, mut shutdown: broadcast::Receiver<()>) -> Result<(), ServerError> {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.port));
        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!(%addr, "HTTP server listening");
        axum::serve(listener, router(self.state.clone()))
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;
        info!("HTTP server stopped");
        Ok(())
    }
}
