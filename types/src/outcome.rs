//! Submission and confirmation statuses reported by the ledger.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::value::ScVal;

/// Immediate response to broadcasting a signed transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SendStatus {
    /// Accepted for inclusion.
    Pending,
    /// Already known to the node; the hash is still valid for polling.
    Duplicate,
    /// The node is congested and dropped the transaction.
    TryAgainLater,
    /// Rejected outright.
    Error,
}

impl SendStatus {
    /// Whether the transaction is now in flight and worth polling for.
    pub fn accepted(&self) -> bool {
        matches!(self, Self::Pending | Self::Duplicate)
    }
}

impl fmt::Display for SendStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pending => "PENDING",
            Self::Duplicate => "DUPLICATE",
            Self::TryAgainLater => "TRY_AGAIN_LATER",
            Self::Error => "ERROR",
        })
    }
}

/// The ledger's view of a transaction hash.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmissionOutcome {
    /// Indexed but not yet finalized.
    Pending,
    /// Applied successfully.
    Success {
        ledger: u32,
        return_value: Option<ScVal>,
    },
    /// Applied but execution failed.
    Failed { reason: String },
    /// The node has not indexed this hash yet.
    NotFound,
}

impl SubmissionOutcome {
    /// No further change is expected for this hash.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Success { .. } | Self::Failed { .. })
    }

    pub fn status_code(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Success { .. } => "SUCCESS",
            Self::Failed { .. } => "FAILED",
            Self::NotFound => "NOT_FOUND",
        }
    }
}
