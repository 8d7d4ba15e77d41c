//! Error taxonomy for the vote lifecycle.
//!
//! Every failed attempt ends in exactly one [`VoteError`]. Each variant maps
//! to an [`ErrorKind`], a [`RetryAdvice`] and a distinct user-facing message.

use ballot_ledger_rpc::RpcError;
use ballot_types::{SendStatus, TxHash};
use std::fmt;
use thiserror::Error;

/// A stage of the vote pipeline, used to tag failures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
    AccountFetch,
    Build,
    Simulate,
    Prepare,
    Sign,
    Submit,
    Confirm,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AccountFetch => "account_fetch",
            Self::Build => "build",
            Self::Simulate => "simulate",
            Self::Prepare => "prepare",
            Self::Sign => "sign",
            Self::Submit => "submit",
            Self::Confirm => "confirm",
        }
    }

    fn describe(&self) -> &'static str {
        match self {
            Self::AccountFetch => "loading your account",
            Self::Build => "building the vote",
            Self::Simulate => "simulating the vote",
            Self::Prepare => "preparing the vote",
            Self::Sign => "signing the vote",
            Self::Submit => "submitting the vote",
            Self::Confirm => "confirming the vote",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors reported by an external signer.
#[derive(Debug, Error)]
pub enum SignerError {
    #[error("signer is not installed or not ready")]
    Unavailable,

    #[error("signer is locked")]
    Locked,

    #[error("user declined to sign: {0}")]
    Declined(String),

    #[error("signer did not answer within {0:?}")]
    Timeout(std::time::Duration),

    #[error("signer returned an unusable envelope: {0}")]
    Malformed(String),

    #[error("signer error: {0}")]
    Other(String),
}

/// Why a vote could not even be attempted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum PreconditionError {
    #[error("no public key connected")]
    NotConnected,

    #[error("no ready signer")]
    SignerUnavailable,
}

#[derive(Debug, Error)]
pub enum VoteError {
    #[error("precondition failed: {0}")]
    Precondition(PreconditionError),

    #[error("{stage} request failed: {source}")]
    Transport { stage: Stage, source: RpcError },

    #[error("simulation failed: {diagnostic}")]
    Simulation { diagnostic: String },

    #[error("signing failed: {0}")]
    Signing(#[from] SignerError),

    #[error("submission rejected with status {status}")]
    Submission {
        status: SendStatus,
        detail: Option<String>,
    },

    #[error("transaction {hash} failed on ledger: {reason}")]
    LedgerRejection { hash: TxHash, reason: String },

    #[error("no terminal status for {hash} after {polls} polls")]
    Timeout { hash: TxHash, polls: u32 },

    #[error("{stage} failed: {message}")]
    Internal { stage: Stage, message: String },
}

/// The error kinds of the vote lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Precondition,
    Transport,
    Simulation,
    Signing,
    Submission,
    LedgerRejection,
    Timeout,
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Precondition => "PreconditionError",
            Self::Transport => "TransportError",
            Self::Simulation => "SimulationError",
            Self::Signing => "SigningError",
            Self::Submission => "SubmissionError",
            Self::LedgerRejection => "LedgerRejection",
            Self::Timeout => "TimeoutError",
            Self::Internal => "InternalError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the caller may safely do after a failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RetryAdvice {
    /// Fix the setup (connect, unlock) first; retrying as-is fails again.
    FixSetup,
    /// Retry the whole attempt, starting from a fresh account fetch.
    RetryAttempt,
    /// Ask the user to approve the signature again.
    Reprompt,
    /// Do not resubmit the same operation.
    DoNotRetry,
    /// Outcome unknown: check the transaction status before any retry.
    CheckStatus,
}

impl VoteError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Precondition(_) => ErrorKind::Precondition,
            Self::Transport { .. } => ErrorKind::Transport,
            Self::Simulation { .. } => ErrorKind::Simulation,
            Self::Signing(_) => ErrorKind::Signing,
            Self::Submission { .. } => ErrorKind::Submission,
            Self::LedgerRejection { .. } => ErrorKind::LedgerRejection,
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::Internal { .. } => ErrorKind::Internal,
        }
    }

    pub fn retry_advice(&self) -> RetryAdvice {
        match self.kind() {
            ErrorKind::Precondition => RetryAdvice::FixSetup,
            ErrorKind::Transport | ErrorKind::Submission => RetryAdvice::RetryAttempt,
            ErrorKind::Signing => RetryAdvice::Reprompt,
            ErrorKind::Simulation | ErrorKind::LedgerRejection | ErrorKind::Internal => {
                RetryAdvice::DoNotRetry
            }
            ErrorKind::Timeout => RetryAdvice::CheckStatus,
        }
    }

    /// The stage the attempt stopped at, when one applies.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::Precondition(_) => None,
            Self::Transport { stage, .. } | Self::Internal { stage, .. } => Some(*stage),
            Self::Simulation { .. } => Some(Stage::Simulate),
            Self::Signing(_) => Some(Stage::Sign),
            Self::Submission { .. } => Some(Stage::Submit),
            Self::LedgerRejection { .. } | Self::Timeout { .. } => Some(Stage::Confirm),
        }
    }

    /// The transaction hash, once one exists.
    pub fn hash(&self) -> Option<TxHash> {
        match self {
            Self::LedgerRejection { hash, .. } | Self::Timeout { hash, .. } => Some(*hash),
            _ => None,
        }
    }

    /// Human-readable explanation, distinct per kind.
    pub fn user_message(&self) -> String {
        match self {
            Self::Precondition(PreconditionError::NotConnected) => {
                "Connect your wallet before voting.".to_string()
            }
            Self::Precondition(PreconditionError::SignerUnavailable) => {
                "No wallet is available to sign. Install or unlock your wallet, then try again."
                    .to_string()
            }
            Self::Transport { stage, .. } => format!(
                "Could not reach the network while {}. Check your connection and try again.",
                stage.describe()
            ),
            Self::Simulation { diagnostic } => {
                format!("The voting contract would reject this vote: {diagnostic}")
            }
            Self::Signing(_) => {
                "The vote was not signed. Approve the request in your wallet to try again."
                    .to_string()
            }
            Self::Submission { status, detail } => match detail {
                Some(detail) => format!("The network refused the vote ({status}: {detail}). Try again."),
                None => format!("The network refused the vote ({status}). Try again."),
            },
            Self::LedgerRejection { reason, .. } => {
                format!("The vote was recorded as failed on the ledger ({reason}).")
            }
            Self::Timeout { hash, .. } => format!(
                "The vote was submitted but not confirmed in time. Check transaction {hash} before voting again."
            ),
            Self::Internal { stage, message } => {
                format!("Something went wrong while {}: {message}", stage.describe())
            }
        }
    }
}

impl From<PreconditionError> for VoteError {
    fn from(e: PreconditionError) -> Self {
        Self::Precondition(e)
    }
}

/// Errors from the proposal store client.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("proposal store request failed: {0}")]
    Transport(String),

    #[error("proposal store returned HTTP {0}")]
    Http(u16),

    #[error("proposal store reported failure: {0}")]
    Unsuccessful(String),

    #[error("malformed proposal list: {0}")]
    Malformed(String),
}

/// Errors from the encrypted keystore.
#[derive(Debug, Error)]
pub enum KeystoreError {
    #[error("unsupported keystore version: {0}")]
    UnsupportedVersion(u32),

    #[error("key derivation failed: {0}")]
    Kdf(String),

    #[error("decryption failed: wrong password or corrupted data")]
    Decrypt,

    #[error("invalid keystore field {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("encryption failed: {0}")]
    Encrypt(String),

    #[error("keystore I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid keystore JSON: {0}")]
    Json(#[from] serde_json::Error),
}
