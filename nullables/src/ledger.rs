//! Nullable ledger node.

use async_trait::async_trait;
use ballot_ledger_rpc::{
    LedgerRpc, RpcError, SendResponse, SimulateHostFunctionResult, SimulateTransactionResponse,
};
use ballot_transactions::transaction_hash;
use ballot_types::codec::to_wire;
use ballot_types::{
    Account, AccountId, NetworkId, ScVal, SendStatus, SorobanTransactionData, SubmissionOutcome,
    Transaction, TransactionEnvelope, TxHash,
};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use crate::lock;

/// One recorded request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LedgerCall {
    GetAccount(AccountId),
    Simulate(TransactionEnvelope),
    Send(TransactionEnvelope),
    GetTransaction(TxHash),
}

/// An in-memory ledger node.
///
/// Unscripted calls behave like a healthy node: simulation succeeds with a
/// fee of 1000 and no return value, submissions are `PENDING`, and the first
/// status lookup of a submitted hash reports `SUCCESS`. A confirmed
/// transaction advances its source account's sequence, as the ledger would.
pub struct NullLedger {
    network: NetworkId,
    latest_ledger: u32,
    accounts: Mutex<HashMap<AccountId, u64>>,
    account_errors: Mutex<VecDeque<RpcError>>,
    simulations: Mutex<VecDeque<Result<SimulateTransactionResponse, RpcError>>>,
    sends: Mutex<VecDeque<Result<SendResponse, RpcError>>>,
    statuses: Mutex<VecDeque<Result<SubmissionOutcome, RpcError>>>,
    submitted: Mutex<HashMap<TxHash, Transaction>>,
    calls: Mutex<Vec<LedgerCall>>,
}

impl NullLedger {
    pub fn new(network: NetworkId) -> Self {
        Self {
            network,
            latest_ledger: 100,
            accounts: Mutex::new(HashMap::new()),
            account_errors: Mutex::new(VecDeque::new()),
            simulations: Mutex::new(VecDeque::new()),
            sends: Mutex::new(VecDeque::new()),
            statuses: Mutex::new(VecDeque::new()),
            submitted: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_account(self, id: AccountId, sequence: u64) -> Self {
        lock(&self.accounts).insert(id, sequence);
        self
    }

    pub fn sequence_of(&self, id: &AccountId) -> Option<u64> {
        lock(&self.accounts).get(id).copied()
    }

    /// Fail the next `get_account` call.
    pub fn fail_next_account_fetch(&self, error: RpcError) {
        lock(&self.account_errors).push_back(error);
    }

    pub fn push_simulation(&self, response: Result<SimulateTransactionResponse, RpcError>) {
        lock(&self.simulations).push_back(response);
    }

    /// Queue a successful simulation returning `value`.
    pub fn push_simulation_value(&self, value: &ScVal) {
        let mut response = Self::healthy_simulation(self.latest_ledger);
        response.results[0].xdr = to_wire(value).ok();
        self.push_simulation(Ok(response));
    }

    /// Queue a simulation the contract rejects.
    pub fn push_simulation_error(&self, diagnostic: impl Into<String>) {
        self.push_simulation(Ok(SimulateTransactionResponse {
            latest_ledger: self.latest_ledger,
            error: Some(diagnostic.into()),
            ..Default::default()
        }));
    }

    /// Queue a `sendTransaction` answer. `Ok` answers keep their status but
    /// take the hash of the envelope actually sent.
    pub fn push_send(&self, response: Result<SendResponse, RpcError>) {
        lock(&self.sends).push_back(response);
    }

    pub fn push_send_status(&self, status: SendStatus) {
        self.push_send(Ok(SendResponse {
            status,
            hash: TxHash::ZERO,
            error_detail: None,
        }));
    }

    /// Queue a `getTransaction` answer.
    pub fn push_status(&self, outcome: Result<SubmissionOutcome, RpcError>) {
        lock(&self.statuses).push_back(outcome);
    }

    pub fn calls(&self) -> Vec<LedgerCall> {
        lock(&self.calls).clone()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    pub fn status_polls(&self) -> usize {
        lock(&self.calls)
            .iter()
            .filter(|c| matches!(c, LedgerCall::GetTransaction(_)))
            .count()
    }

    /// Envelopes passed to `sendTransaction`, in order.
    pub fn sent_envelopes(&self) -> Vec<TransactionEnvelope> {
        lock(&self.calls)
            .iter()
            .filter_map(|c| match c {
                LedgerCall::Send(envelope) => Some(envelope.clone()),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: LedgerCall) {
        lock(&self.calls).push(call);
    }

    fn healthy_simulation(latest_ledger: u32) -> SimulateTransactionResponse {
        SimulateTransactionResponse {
            latest_ledger,
            min_resource_fee: Some("1000".to_string()),
            transaction_data: to_wire(&SorobanTransactionData::default()).ok(),
            results: vec![SimulateHostFunctionResult::default()],
            error: None,
            events: Vec::new(),
        }
    }

    fn hash_of(&self, envelope: &TransactionEnvelope) -> Result<TxHash, RpcError> {
        transaction_hash(&envelope.tx, self.network).map_err(|e| RpcError::Malformed(e.to_string()))
    }

    fn apply(&self, hash: &TxHash) {
        if let Some(tx) = lock(&self.submitted).remove(hash) {
            lock(&self.accounts).insert(tx.source, tx.sequence);
        }
    }
}

#[async_trait]
impl LedgerRpc for NullLedger {
    async fn get_account(&self, id: &AccountId) -> Result<Account, RpcError> {
        self.record(LedgerCall::GetAccount(id.clone()));
        if let Some(error) = lock(&self.account_errors).pop_front() {
            return Err(error);
        }
        self.sequence_of(id)
            .map(|sequence| Account::new(id.clone(), sequence))
            .ok_or_else(|| RpcError::AccountNotFound(id.to_string()))
    }

    async fn simulate_transaction(
        &self,
        envelope: &TransactionEnvelope,
    ) -> Result<SimulateTransactionResponse, RpcError> {
        self.record(LedgerCall::Simulate(envelope.clone()));
        lock(&self.simulations)
            .pop_front()
            .unwrap_or_else(|| Ok(Self::healthy_simulation(self.latest_ledger)))
    }

    async fn send_transaction(&self, envelope: &TransactionEnvelope) -> Result<SendResponse, RpcError> {
        self.record(LedgerCall::Send(envelope.clone()));
        let hash = self.hash_of(envelope)?;
        let scripted = lock(&self.sends).pop_front();
        let response = match scripted {
            Some(Ok(response)) => SendResponse { hash, ..response },
            Some(Err(e)) => return Err(e),
            None => SendResponse {
                status: SendStatus::Pending,
                hash,
                error_detail: None,
            },
        };
        if response.status.accepted() {
            lock(&self.submitted).insert(hash, envelope.tx.clone());
        }
        Ok(response)
    }

    async fn get_transaction(&self, hash: &TxHash) -> Result<SubmissionOutcome, RpcError> {
        self.record(LedgerCall::GetTransaction(*hash));
        let scripted = lock(&self.statuses).pop_front();
        let outcome = match scripted {
            Some(outcome) => outcome?,
            None if lock(&self.submitted).contains_key(hash) => SubmissionOutcome::Success {
                ledger: self.latest_ledger + 1,
                return_value: None,
            },
            None => SubmissionOutcome::NotFound,
        };
        if matches!(outcome, SubmissionOutcome::Success { .. }) {
            self.apply(hash);
        }
        Ok(outcome)
    }
}
