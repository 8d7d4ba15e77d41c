//! Error type for parsing and decoding ledger data.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TypesError {
    #[error("invalid account id: {0}")]
    InvalidAccountId(String),

    #[error("invalid contract id: {0}")]
    InvalidContractId(String),

    #[error("invalid transaction hash: {0}")]
    InvalidHash(String),

    #[error("unknown network: {0}")]
    UnknownNetwork(String),

    #[error("wire encoding failed: {0}")]
    Encode(String),

    #[error("wire decoding failed: {0}")]
    Decode(String),

    #[error("invalid contract value: {0}")]
    InvalidValue(String),
}
