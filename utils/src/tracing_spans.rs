//! Pre-built [`tracing::Span`] constructors for vote lifecycle operations.
//!
//! Consistent span names and field sets make it easy to filter and correlate
//! a single vote attempt across the orchestrator, the ledger client and the
//! HTTP server.

use tracing::{debug_span, info_span, Span};

/// Span covering one full vote attempt.
pub fn vote_span(proposal_id: u64, choice: bool) -> Span {
    info_span!("vote", proposal_id, choice)
}

/// Span covering one lifecycle stage inside a vote attempt.
pub fn stage_span(stage: &str) -> Span {
    debug_span!("stage", stage = %stage)
}

/// Span covering a single contract simulation.
pub fn simulate_span(contract: &str, function: &str) -> Span {
    info_span!("simulate", contract = %contract, function = %function)
}

/// Span covering an inbound HTTP request handled by the server.
pub fn http_span(method: &str, path: &str) -> Span {
    info_span!("http", method = %method, path = %path)
}

/// Span covering an outbound JSON-RPC call to the ledger node.
pub fn rpc_span(method: &str) -> Span {
    debug_span!("ledger_rpc", method = %method)
}
