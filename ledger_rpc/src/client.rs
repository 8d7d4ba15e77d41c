//! HTTP JSON-RPC client for a ledger node.

use async_trait::async_trait;
use ballot_types::codec::to_wire;
use ballot_types::{
    Account, AccountId, SendStatus, SubmissionOutcome, TransactionEnvelope, TxHash,
};
use ballot_utils::tracing_spans::rpc_span;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{debug, Instrument};

use crate::error::RpcError;
use crate::wire::{
    GetAccountParams, GetAccountResponse, GetTransactionParams, GetTransactionResponse,
    JsonRpcRequest, JsonRpcResponse, SendTransactionResponse, SimulateTransactionResponse,
    TransactionParams,
};
use crate::{LedgerRpc, SendResponse};

/// Talks JSON-RPC 2.0 to a ledger node over HTTP.
pub struct HttpLedgerRpc {
    http: reqwest::Client,
    url: String,
    next_id: AtomicU64,
}

impl HttpLedgerRpc {
    /// Create a client targeting the node's RPC URL.
    pub fn new(url: impl Into<String>) -> Result<Self, RpcError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| RpcError::Transport(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            http,
            url: url.into(),
            next_id: AtomicU64::new(1),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Send a JSON-RPC request and decode its `result`.
    ///
    /// A `null` result decodes as `None`.
    async fn rpc_call<P: Serialize, R: DeserializeOwned>(
        &self,
        method: &str,
        params: P,
    ) -> Result<Option<R>, RpcError> {
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };

        let response = self
            .http
            .post(&self.url)
            .json(&request)
            .send()
            .instrument(rpc_span(method))
            .await
            .map_err(|e| RpcError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(RpcError::Http(response.status().as_u16()));
        }

        let body: JsonRpcResponse = response
            .json()
            .await
            .map_err(|e| RpcError::Malformed(format!("invalid JSON-RPC body: {e}")))?;

        if let Some(err) = body.error {
            return Err(RpcError::JsonRpc {
                code: err.code,
                message: err.message,
            });
        }

        match body.result {
            None | Some(serde_json::Value::Null) => Ok(None),
            Some(value) => serde_json::from_value(value)
                .map(Some)
                .map_err(|e| RpcError::Malformed(format!("{method}: {e}"))),
        }
    }

    async fn required<P: Serialize, R: DeserializeOwned>(
        &self,
        method: &str,
        params: P,
    ) -> Result<R, RpcError> {
        self.rpc_call(method, params)
            .await?
            .ok_or_else(|| RpcError::Malformed(format!("{method}: empty result")))
    }
}

#[async_trait]
impl LedgerRpc for HttpLedgerRpc {
    async fn get_account(&self, id: &AccountId) -> Result<Account, RpcError> {
        let found: Option<GetAccountResponse> = self
            .rpc_call("getAccount", GetAccountParams { address: id.as_str() })
            .await?;
        let account = found
            .ok_or_else(|| RpcError::AccountNotFound(id.to_string()))?
            .into_account()?;
        debug!(account = %id.abbreviated(), sequence = account.sequence, "fetched account");
        Ok(account)
    }

    async fn simulate_transaction(
        &self,
        envelope: &TransactionEnvelope,
    ) -> Result<SimulateTransactionResponse, RpcError> {
        let params = TransactionParams {
            transaction: to_wire(envelope)?,
        };
        self.required("simulateTransaction", params).await
    }

    async fn send_transaction(
        &self,
        envelope: &TransactionEnvelope,
    ) -> Result<SendResponse, RpcError> {
        let params = TransactionParams {
            transaction: to_wire(envelope)?,
        };
        let dto: SendTransactionResponse = self.required("sendTransaction", params).await?;
        let status: SendStatus = serde_json::from_value(serde_json::Value::String(dto.status.clone()))
            .map_err(|_| RpcError::Malformed(format!("unknown send status {:?}", dto.status)))?;
        let hash = TxHash::from_hex(&dto.hash)?;
        debug!(%hash, %status, "sendTransaction answered");
        Ok(SendResponse {
            status,
            hash,
            error_detail: dto.error_result_xdr,
        })
    }

    async fn get_transaction(&self, hash: &TxHash) -> Result<SubmissionOutcome, RpcError> {
        let hex = hash.to_hex();
        let dto: GetTransactionResponse = self
            .required("getTransaction", GetTransactionParams { hash: &hex })
            .await?;
        dto.into_outcome()
    }
}
