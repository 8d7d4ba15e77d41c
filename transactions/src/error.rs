use ballot_types::TypesError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransactionError {
    #[error("transaction has no operations")]
    NoOperations,

    #[error("expected exactly one invoke-contract operation, found {0}")]
    NotSingleInvoke(usize),

    #[error("account {0} has exhausted its sequence numbers")]
    SequenceExhausted(String),

    #[error("prepared fee overflows: base {base} + resource fee {resource}")]
    FeeOverflow { base: u32, resource: u64 },

    #[error("signed transaction hash {actual} does not match prepared hash {expected}")]
    HashMismatch { expected: String, actual: String },

    #[error("signed transaction carries no signature from {0}")]
    MissingSignature(String),

    #[error("account id {0} does not decode to a public key")]
    UndecodableAccount(String),

    #[error(transparent)]
    Codec(#[from] TypesError),
}
