//! Nullable infrastructure for deterministic vote tests.
//!
//! Each type stands in for one external boundary of the vote lifecycle:
//! - [`NullLedger`] for the ledger node
//! - [`NullSigner`] for the wallet holding the voter's key
//! - [`NullProposalFeed`] for the proposal list endpoint
//!
//! They answer from scripted queues, record every call for assertions, and
//! never touch the network.

pub mod feed;
pub mod ledger;
pub mod signer;

use std::sync::{Mutex, MutexGuard, PoisonError};

pub use feed::NullProposalFeed;
pub use ledger::{LedgerCall, NullLedger};
pub use signer::{NullSigner, SignBehavior};

/// Lock, ignoring poisoning from a panicking test thread.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
