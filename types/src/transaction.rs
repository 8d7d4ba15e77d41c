//! Transactions, resource data and envelopes.

use serde::{Deserialize, Serialize};

use crate::address::{AccountId, ContractId};
use crate::keys::Signature;
use crate::operation::Operation;
use crate::value::ScVal;

/// Validity window in Unix seconds. `max_time == 0` means unbounded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeBounds {
    pub min_time: u64,
    pub max_time: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Durability {
    Temporary,
    Persistent,
}

/// A ledger entry a transaction reads or writes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerKey {
    Account(AccountId),
    ContractData {
        contract: ContractId,
        key: ScVal,
        durability: Durability,
    },
    ContractCode {
        hash: [u8; 32],
    },
}

/// The read-only and read-write entry sets of a transaction.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerFootprint {
    pub read_only: Vec<LedgerKey>,
    pub read_write: Vec<LedgerKey>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SorobanResources {
    pub footprint: LedgerFootprint,
    pub instructions: u32,
    pub read_bytes: u32,
    pub write_bytes: u32,
}

/// Resource and footprint data produced by simulation.
///
/// A contract transaction without this attached is rejected by ledger nodes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SorobanTransactionData {
    pub resources: SorobanResources,
    pub resource_fee: i64,
}

/// A transaction body. Signatures live on the envelope.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub source: AccountId,
    /// Fee bid in stroops.
    pub fee: u32,
    pub sequence: u64,
    pub time_bounds: Option<TimeBounds>,
    pub operations: Vec<Operation>,
    pub soroban_data: Option<SorobanTransactionData>,
}

/// A signature plus the last four bytes of the signing key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecoratedSignature {
    pub hint: [u8; 4],
    pub signature: Signature,
}

/// A transaction with zero or more signatures, the unit sent over the wire.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionEnvelope {
    pub tx: Transaction,
    pub signatures: Vec<DecoratedSignature>,
}

impl TransactionEnvelope {
    pub fn unsigned(tx: Transaction) -> Self {
        Self {
            tx,
            signatures: Vec::new(),
        }
    }
}
