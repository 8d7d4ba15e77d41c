//! JSON-RPC 2.0 request and response bodies.
//!
//! Field names follow the node's camelCase JSON. Envelopes, resource data,
//! auth entries and contract values travel as wire strings
//! (see `ballot_types::codec`).

use ballot_types::codec::from_wire;
use ballot_types::{Account, AccountId, ScVal, SubmissionOutcome};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::RpcError;

#[derive(Debug, Serialize)]
pub struct JsonRpcRequest<'a, P> {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: &'a str,
    pub params: P,
}

#[derive(Debug, Deserialize)]
pub struct JsonRpcResponse {
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<JsonRpcErrorObject>,
}

#[derive(Debug, Deserialize)]
pub struct JsonRpcErrorObject {
    pub code: i64,
    pub message: String,
}

// ── getAccount ───────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct GetAccountParams<'a> {
    pub address: &'a str,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GetAccountResponse {
    pub id: String,
    /// Decimal string; sequence numbers exceed the safe JSON integer range.
    pub sequence: String,
}

impl GetAccountResponse {
    pub fn into_account(self) -> Result<Account, RpcError> {
        let id = AccountId::parse(self.id)?;
        let sequence = self
            .sequence
            .parse::<u64>()
            .map_err(|_| RpcError::Malformed(format!("sequence {:?}", self.sequence)))?;
        Ok(Account::new(id, sequence))
    }
}

// ── simulateTransaction / sendTransaction ────────────────────────────────

#[derive(Debug, Serialize)]
pub struct TransactionParams {
    pub transaction: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulateTransactionResponse {
    #[serde(default)]
    pub latest_ledger: u32,
    /// Decimal string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_resource_fee: Option<String>,
    /// Wire-encoded `SorobanTransactionData`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_data: Option<String>,
    #[serde(default)]
    pub results: Vec<SimulateHostFunctionResult>,
    /// Present when the contract would reject the invocation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default)]
    pub events: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulateHostFunctionResult {
    /// Wire-encoded return value; absent when the call returned nothing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xdr: Option<String>,
    /// Wire-encoded auth entries.
    #[serde(default)]
    pub auth: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendTransactionResponse {
    pub status: String,
    pub hash: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_result_xdr: Option<String>,
    #[serde(default)]
    pub latest_ledger: u32,
}

// ── getTransaction ───────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct GetTransactionParams<'a> {
    pub hash: &'a str,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetTransactionResponse {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ledger: Option<u32>,
    /// Wire-encoded return value of a successful invocation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_value: Option<String>,
    /// Result code of a failed transaction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_xdr: Option<String>,
}

impl GetTransactionResponse {
    pub fn into_outcome(self) -> Result<SubmissionOutcome, RpcError> {
        match self.status.as_str() {
            "SUCCESS" => {
                let return_value = self
                    .return_value
                    .as_deref()
                    .filter(|w| !w.is_empty())
                    .map(from_wire::<ScVal>)
                    .transpose()?;
                Ok(SubmissionOutcome::Success {
                    ledger: self.ledger.unwrap_or_default(),
                    return_value,
                })
            }
            "FAILED" => Ok(SubmissionOutcome::Failed {
                reason: self.result_xdr.unwrap_or_else(|| "FAILED".to_string()),
            }),
            "NOT_FOUND" => Ok(SubmissionOutcome::NotFound),
            "PENDING" => Ok(SubmissionOutcome::Pending),
            other => Err(RpcError::Malformed(format!(
                "unknown transaction status {other:?}"
            ))),
        }
    }
}
