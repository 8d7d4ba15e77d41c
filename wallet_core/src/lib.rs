//! Vote casting for ballot.
//!
//! - [`VoteOrchestrator`] drives one vote through fetch, build, simulate,
//!   prepare, sign, submit and confirm
//! - [`Signer`] is the boundary to whatever holds the voter's key
//! - [`VoteSession`] tracks the connected voter between attempts
//! - [`LocalSigner`] and the keystore back the CLI

pub mod error;
pub mod keystore;
pub mod local_signer;
pub mod orchestrator;
pub mod proposals;
pub mod session;
pub mod signer;

pub use error::{
    ErrorKind, FeedError, KeystoreError, PreconditionError, RetryAdvice, SignerError, Stage,
    VoteError,
};
pub use keystore::{
    decrypt_keystore, encrypt_keystore, encrypt_keystore_with_params, load_keystore,
    save_keystore, KdfParams, KeystoreFile,
};
pub use local_signer::LocalSigner;
pub use orchestrator::{
    AttemptState, AttemptUpdate, OrchestratorConfig, PollPolicy, VoteOrchestrator, VoteReceipt,
    DEFAULT_SIGN_TIMEOUT, DEFAULT_VOTE_FEE, POLL_MARGIN_SECS,
};
pub use proposals::{HttpProposalFeed, ProposalFeed, ProposalsResponse};
pub use session::VoteSession;
pub use signer::{Readiness, ReadinessNotifier, SignOptions, Signer, SignerReadiness};
