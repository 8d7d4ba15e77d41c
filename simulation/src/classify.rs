use ballot_ledger_rpc::SimulateTransactionResponse;
use ballot_types::codec::from_wire;
use ballot_types::{
    AuthEntry, ReturnValue, ScVal, SimulationFailure, SimulationResult, SimulationSuccess,
    SorobanTransactionData,
};

/// Classify a node's simulate response.
///
/// - a reported `error` becomes [`SimulationResult::Error`] with the
///   diagnostic passed through untouched
/// - a missing return value becomes [`ReturnValue::NoValue`]
/// - anything present but undecodable is an error, never `NoValue`
pub fn classify(response: SimulateTransactionResponse) -> SimulationResult {
    match try_classify(response) {
        Ok(success) => SimulationResult::Success(success),
        Err(failure) => SimulationResult::Error(failure),
    }
}

fn try_classify(response: SimulateTransactionResponse) -> Result<SimulationSuccess, SimulationFailure> {
    if let Some(diagnostic) = response.error {
        return Err(SimulationFailure {
            diagnostic,
            events: response.events,
        });
    }

    let transaction_data = match response.transaction_data.as_deref() {
        Some(wire) => from_wire::<SorobanTransactionData>(wire)
            .map_err(|e| SimulationFailure::new(format!("undecodable transaction data: {e}")))?,
        None => return Err(SimulationFailure::new("simulation returned no transaction data")),
    };

    let min_resource_fee = match response.min_resource_fee.as_deref() {
        Some(fee) => fee
            .parse::<u64>()
            .map_err(|_| SimulationFailure::new(format!("invalid minResourceFee {fee:?}")))?,
        None => 0,
    };

    let first = response.results.into_iter().next().unwrap_or_default();
    let return_value = match first.xdr.as_deref().filter(|w| !w.is_empty()) {
        Some(wire) => ReturnValue::Value(
            from_wire::<ScVal>(wire)
                .map_err(|e| SimulationFailure::new(format!("undecodable return value: {e}")))?,
        ),
        None => ReturnValue::NoValue,
    };

    let auth = first
        .auth
        .iter()
        .map(|wire| from_wire::<AuthEntry>(wire))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| SimulationFailure::new(format!("undecodable auth entry: {e}")))?;

    Ok(SimulationSuccess {
        return_value,
        transaction_data,
        min_resource_fee,
        auth,
        latest_ledger: response.latest_ledger,
    })
}
