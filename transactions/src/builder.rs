//! Transaction builder.

use ballot_types::{Account, NetworkId, Operation, TimeBounds, Timestamp, Transaction};

use crate::envelope::UnsignedTransaction;
use crate::error::TransactionError;

/// Validity window used when the caller does not set one.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Builds one [`UnsignedTransaction`] from one account snapshot.
///
/// The builder consumes the snapshot's next sequence number, so a builder
/// (and the transaction it produces) belongs to exactly one submission
/// attempt. Retrying means fetching the account again and building anew.
#[derive(Debug)]
pub struct TransactionBuilder {
    source: Account,
    fee: u32,
    network: NetworkId,
    timeout_secs: u64,
    operations: Vec<Operation>,
}

impl TransactionBuilder {
    pub fn new(source: &Account, fee: u32, network: NetworkId) -> Self {
        Self {
            source: source.clone(),
            fee,
            network,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            operations: Vec::new(),
        }
    }

    pub fn add_operation(mut self, operation: Operation) -> Self {
        self.operations.push(operation);
        self
    }

    /// Seconds from build time until the transaction expires. `0` means no
    /// upper bound.
    pub fn set_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn build(self) -> Result<UnsignedTransaction, TransactionError> {
        self.build_at(Timestamp::now())
    }

    /// Build with an explicit clock reading.
    pub fn build_at(self, now: Timestamp) -> Result<UnsignedTransaction, TransactionError> {
        if self.operations.is_empty() {
            return Err(TransactionError::NoOperations);
        }
        let sequence = self
            .source
            .next_sequence()
            .ok_or_else(|| TransactionError::SequenceExhausted(self.source.id.to_string()))?;
        let max_time = if self.timeout_secs == 0 {
            0
        } else {
            now.plus_secs(self.timeout_secs).as_secs()
        };
        let tx = Transaction {
            source: self.source.id.clone(),
            fee: self.fee,
            sequence,
            time_bounds: Some(TimeBounds {
                min_time: 0,
                max_time,
            }),
            operations: self.operations,
            soroban_data: None,
        };
        Ok(UnsignedTransaction::new(tx, self.network))
    }
}
