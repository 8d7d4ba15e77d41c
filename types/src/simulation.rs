//! Simulation results.
//!
//! A simulation is advisory: it commits nothing and carries no confirmed
//! ledger state. It either yields the data needed to prepare the transaction
//! or a diagnostic explaining why the contract would reject it.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::operation::AuthEntry;
use crate::transaction::SorobanTransactionData;
use crate::value::ScVal;

/// What a successful simulation returned.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReturnValue {
    /// The invocation produced no return value. Not a decode failure.
    NoValue,
    Value(ScVal),
}

impl ReturnValue {
    /// Native JSON view; `NoValue` maps to `null`.
    pub fn to_native(&self) -> Value {
        match self {
            Self::NoValue => Value::Null,
            Self::Value(v) => v.to_native(),
        }
    }

    pub fn value(&self) -> Option<&ScVal> {
        match self {
            Self::NoValue => None,
            Self::Value(v) => Some(v),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationSuccess {
    pub return_value: ReturnValue,
    pub transaction_data: SorobanTransactionData,
    pub min_resource_fee: u64,
    pub auth: Vec<AuthEntry>,
    pub latest_ledger: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationFailure {
    /// Raw diagnostic text, passed through unmodified.
    pub diagnostic: String,
    pub events: Vec<String>,
}

impl SimulationFailure {
    pub fn new(diagnostic: impl Into<String>) -> Self {
        Self {
            diagnostic: diagnostic.into(),
            events: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimulationResult {
    Success(SimulationSuccess),
    Error(SimulationFailure),
}

impl SimulationResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}
