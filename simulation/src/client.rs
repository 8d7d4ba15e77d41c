use std::sync::Arc;

use ballot_crypto::{account_id_from_public_key, generate_keypair};
use ballot_ledger_rpc::LedgerRpc;
use ballot_transactions::TransactionBuilder;
use ballot_types::{
    Account, ContractId, InvokeContractOp, NetworkId, Operation, ScVal, SimulationFailure,
    SimulationResult,
};
use ballot_utils::tracing_spans::simulate_span;
use tracing::{debug, warn, Instrument};

use crate::classify::classify;

/// Fee bid on simulation-only transactions, in stroops.
pub const SIMULATION_FEE: u32 = 100;
/// Validity window on simulation-only transactions.
pub const SIMULATION_TIMEOUT_SECS: u64 = 30;

/// A syntactically valid source account that is never funded or submitted.
///
/// Each call generates a fresh key so no simulation shares account state
/// with another, or with a real voter.
pub fn disposable_account() -> Account {
    let keypair = generate_keypair();
    Account::new(account_id_from_public_key(&keypair.public), 0)
}

/// Dry-runs contract calls against a ledger node.
#[derive(Clone)]
pub struct SimulationClient {
    rpc: Arc<dyn LedgerRpc>,
    network: NetworkId,
    fee: u32,
}

impl SimulationClient {
    pub fn new(rpc: Arc<dyn LedgerRpc>, network: NetworkId) -> Self {
        Self {
            rpc,
            network,
            fee: SIMULATION_FEE,
        }
    }

    pub fn with_fee(mut self, fee: u32) -> Self {
        self.fee = fee;
        self
    }

    pub fn network(&self) -> NetworkId {
        self.network
    }

    /// Simulate `contract.function(args...)` from a disposable account.
    ///
    /// Never fails: build problems, transport faults and malformed node
    /// responses all come back as [`SimulationResult::Error`].
    pub async fn simulate(
        &self,
        contract: &ContractId,
        function: &str,
        args: Vec<ScVal>,
    ) -> SimulationResult {
        let span = simulate_span(contract.as_str(), function);
        self.simulate_inner(contract, function, args)
            .instrument(span)
            .await
    }

    async fn simulate_inner(
        &self,
        contract: &ContractId,
        function: &str,
        args: Vec<ScVal>,
    ) -> SimulationResult {
        if let Err(e) = ScVal::symbol(function) {
            return SimulationResult::Error(SimulationFailure::new(e.to_string()));
        }

        let operation = Operation::InvokeContract(InvokeContractOp::new(
            contract.clone(),
            function,
            args,
        ));
        let unsigned = match TransactionBuilder::new(&disposable_account(), self.fee, self.network)
            .add_operation(operation)
            .set_timeout(SIMULATION_TIMEOUT_SECS)
            .build()
        {
            Ok(unsigned) => unsigned,
            Err(e) => return SimulationResult::Error(SimulationFailure::new(e.to_string())),
        };

        let result = match self.rpc.simulate_transaction(&unsigned.envelope()).await {
            Ok(response) => classify(response),
            Err(e) => {
                warn!(error = %e, "simulation transport failure");
                SimulationResult::Error(SimulationFailure::new(format!("transport: {e}")))
            }
        };

        match &result {
            SimulationResult::Success(s) => {
                debug!(latest_ledger = s.latest_ledger, "simulation succeeded")
            }
            SimulationResult::Error(f) => debug!(diagnostic = %f.diagnostic, "simulation failed"),
        }
        result
    }
}
