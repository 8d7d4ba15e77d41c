//! Account snapshot as read from the ledger.

use serde::{Deserialize, Serialize};

use crate::address::AccountId;

/// A point-in-time view of a ledger account.
///
/// The ledger owns the real account; this snapshot is read immediately
/// before building a transaction and is never written back. The sequence
/// number advances only when a submitted transaction is applied.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub sequence: u64,
}

impl Account {
    pub fn new(id: AccountId, sequence: u64) -> Self {
        Self { id, sequence }
    }

    /// The sequence number the next transaction from this account must carry,
    /// or `None` once the account's sequence space is used up.
    pub fn next_sequence(&self) -> Option<u64> {
        self.sequence.checked_add(1)
    }
}
