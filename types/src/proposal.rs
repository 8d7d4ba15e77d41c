//! Read-only view of a voting proposal.

use serde::{Deserialize, Serialize};

/// A proposal as stored by the voting contract and served by the proposal
/// store. Tallies change only through confirmed on-ledger votes.
///
/// Contracts without proposal text store only id, tallies and the active
/// flag; `title` and `description` are then empty.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub is_active: bool,
    #[serde(default)]
    pub yes_votes: u64,
    #[serde(default)]
    pub no_votes: u64,
}

impl Proposal {
    /// The contract's placeholder for an unknown id has `id == 0`.
    pub fn is_sentinel(&self) -> bool {
        self.id == 0
    }

    pub fn total_votes(&self) -> u64 {
        self.yes_votes.saturating_add(self.no_votes)
    }
}
