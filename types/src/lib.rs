//! Ledger data model shared by every ballot crate.
//!
//! This crate defines the types that flow through the vote lifecycle:
//! account snapshots, typed contract values, invoke-contract operations,
//! transactions and envelopes, simulation results, submission outcomes and
//! the read-only proposal view. It also owns the wire codec used for every
//! envelope and value that crosses the RPC or signer boundary.

pub mod account;
pub mod address;
pub mod codec;
pub mod error;
pub mod hash;
pub mod keys;
pub mod network;
pub mod operation;
pub mod outcome;
pub mod proposal;
pub mod simulation;
pub mod time;
pub mod transaction;
pub mod value;

pub use account::Account;
pub use address::{AccountId, ContractId};
pub use error::TypesError;
pub use hash::TxHash;
pub use keys::{KeyPair, PrivateKey, PublicKey, Signature};
pub use network::NetworkId;
pub use operation::{AuthCredentials, AuthEntry, AuthorizedInvocation, InvokeContractOp, Operation};
pub use outcome::{SendStatus, SubmissionOutcome};
pub use proposal::Proposal;
pub use simulation::{ReturnValue, SimulationFailure, SimulationResult, SimulationSuccess};
pub use time::Timestamp;
pub use transaction::{
    DecoratedSignature, LedgerFootprint, LedgerKey, SorobanResources, SorobanTransactionData,
    TimeBounds, Transaction, TransactionEnvelope,
};
pub use value::{ScAddress, ScVal};
