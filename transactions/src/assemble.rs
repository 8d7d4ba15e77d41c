//! Merge simulation output into a built transaction.

use ballot_types::{Operation, SimulationSuccess};

use crate::envelope::{PreparedTransaction, UnsignedTransaction};
use crate::error::TransactionError;

/// Produce the prepared form of `unsigned` from a successful simulation.
///
/// - fee becomes the built fee plus the simulation's minimum resource fee
/// - soroban data is replaced by the simulation's transaction data
/// - the invocation's auth entries come from the simulation when the built
///   operation carries none
///
/// Only transactions with exactly one invoke-contract operation can be
/// prepared.
pub fn assemble(
    unsigned: &UnsignedTransaction,
    simulation: &SimulationSuccess,
) -> Result<PreparedTransaction, TransactionError> {
    let mut tx = unsigned.tx().clone();
    if tx.operations.len() != 1 {
        return Err(TransactionError::NotSingleInvoke(tx.operations.len()));
    }

    let resource = simulation.min_resource_fee;
    tx.fee = u32::try_from(resource)
        .ok()
        .and_then(|r| tx.fee.checked_add(r))
        .ok_or(TransactionError::FeeOverflow {
            base: tx.fee,
            resource,
        })?;
    tx.soroban_data = Some(simulation.transaction_data.clone());

    let Operation::InvokeContract(op) = &mut tx.operations[0];
    if op.auth.is_empty() {
        op.auth = simulation.auth.clone();
    }

    Ok(PreparedTransaction::new(tx, unsigned.network()))
}
