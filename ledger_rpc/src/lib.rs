//! The ledger node boundary.
//!
//! [`LedgerRpc`] is the four-call surface the vote lifecycle needs from a
//! ledger node: read an account, simulate, send, and look up a transaction.
//! [`HttpLedgerRpc`] speaks JSON-RPC 2.0 over HTTP; tests substitute
//! in-memory implementations.

pub mod client;
pub mod error;
pub mod wire;

use async_trait::async_trait;
use ballot_types::{Account, AccountId, SendStatus, SubmissionOutcome, TransactionEnvelope, TxHash};

pub use client::HttpLedgerRpc;
pub use error::RpcError;
pub use wire::{SimulateHostFunctionResult, SimulateTransactionResponse};

/// The node's immediate answer to `sendTransaction`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SendResponse {
    pub status: SendStatus,
    pub hash: TxHash,
    /// Node-supplied detail for `ERROR` responses.
    pub error_detail: Option<String>,
}

#[async_trait]
pub trait LedgerRpc: Send + Sync {
    /// Current snapshot of an account. Missing accounts are
    /// [`RpcError::AccountNotFound`].
    async fn get_account(&self, id: &AccountId) -> Result<Account, RpcError>;

    /// Dry-run an envelope. Contract-level failures are reported inside the
    /// response, not as an `Err`.
    async fn simulate_transaction(
        &self,
        envelope: &TransactionEnvelope,
    ) -> Result<SimulateTransactionResponse, RpcError>;

    async fn send_transaction(&self, envelope: &TransactionEnvelope) -> Result<SendResponse, RpcError>;

    async fn get_transaction(&self, hash: &TxHash) -> Result<SubmissionOutcome, RpcError>;
}
