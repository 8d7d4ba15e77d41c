//! Ledger RPC error types.

use ballot_types::TypesError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("node returned HTTP {0}")]
    Http(u16),

    #[error("node error {code}: {message}")]
    JsonRpc { code: i64, message: String },

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("account not found: {0}")]
    AccountNotFound(String),

    #[error(transparent)]
    Codec(#[from] TypesError),
}
