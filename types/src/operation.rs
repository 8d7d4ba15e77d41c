//! Contract invocation operations and their authorization entries.

use serde::{Deserialize, Serialize};

use crate::address::ContractId;
use crate::value::{ScAddress, ScVal};

/// A single call `contract.function(args...)`.
///
/// Argument order is part of the contract's interface and is preserved
/// exactly as constructed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvokeContractOp {
    pub contract: ContractId,
    pub function: String,
    pub args: Vec<ScVal>,
    /// Authorization entries, normally filled in from simulation.
    pub auth: Vec<AuthEntry>,
}

impl InvokeContractOp {
    pub fn new(contract: ContractId, function: impl Into<String>, args: Vec<ScVal>) -> Self {
        Self {
            contract,
            function: function.into(),
            args,
            auth: Vec::new(),
        }
    }
}

/// Who authorizes an invocation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthCredentials {
    /// Covered by the transaction source account's signature.
    SourceAccount,
    /// A separate address signature, bounded by a nonce and expiry ledger.
    Address {
        address: ScAddress,
        nonce: i64,
        signature_expiration_ledger: u32,
    },
}

/// The call tree an auth entry covers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizedInvocation {
    pub contract: ContractId,
    pub function: String,
    pub args: Vec<ScVal>,
    pub sub_invocations: Vec<AuthorizedInvocation>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthEntry {
    pub credentials: AuthCredentials,
    pub root_invocation: AuthorizedInvocation,
}

/// Operations a ballot transaction may carry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    InvokeContract(InvokeContractOp),
}

impl Operation {
    pub fn as_invoke(&self) -> Option<&InvokeContractOp> {
        match self {
            Self::InvokeContract(op) => Some(op),
        }
    }
}
