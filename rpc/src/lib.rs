//! HTTP server for ballot.
//!
//! Endpoints:
//! - `GET /` liveness line
//! - `POST /simulate` dry-run any contract function with tagged arguments
//! - `GET /api/proposals` proposal list read from the voting contract
//! - `GET /metrics` Prometheus text exposition

pub mod error;
pub mod handlers;
pub mod metrics;
pub mod proposals;
pub mod server;
pub mod shutdown;

pub use error::ServerError;
pub use metrics::ServerMetrics;
pub use proposals::{LedgerProposalStore, DEFAULT_MAX_PROPOSALS};
pub use server::{router, AppState, RpcServer};
pub use shutdown::ShutdownController;
