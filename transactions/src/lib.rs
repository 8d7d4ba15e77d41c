//! Transaction lifecycle for ballot.
//!
//! A vote moves through three typed stages, each produced only from the
//! previous one:
//! - [`UnsignedTransaction`]: built by [`TransactionBuilder`] from a fresh
//!   account snapshot.
//! - [`PreparedTransaction`]: the unsigned transaction merged with simulation
//!   output by [`assemble`]. Ledger nodes reject anything less.
//! - [`SignedTransaction`]: decoded from the signer's wire output and checked
//!   against the prepared transaction it claims to sign.

pub mod assemble;
pub mod builder;
pub mod envelope;
pub mod error;
pub mod hash;
pub mod vote;

pub use assemble::assemble;
pub use builder::{TransactionBuilder, DEFAULT_TIMEOUT_SECS};
pub use envelope::{sign_envelope, PreparedTransaction, SignedTransaction, UnsignedTransaction};
pub use error::TransactionError;
pub use hash::{transaction_hash, transaction_hash_for_passphrase};
pub use vote::{cast_vote_args, cast_vote_op, view_proposal_args, CAST_VOTE_FN, VIEW_PROPOSAL_FN};
