//! Network-bound transaction hashing.
//!
//! `hash = SHA-256(network_id ‖ ENVELOPE_TYPE_TX ‖ bincode(tx))` where
//! `network_id = SHA-256(passphrase)`. The same transaction hashes
//! differently on every network, so a signature for one network can never be
//! replayed on another.

use ballot_crypto::{network_id, sha256_multi};
use ballot_types::{NetworkId, Transaction, TxHash, TypesError};

use crate::error::TransactionError;

/// Envelope type tag mixed into the hash preimage.
pub const ENVELOPE_TYPE_TX: [u8; 4] = [0, 0, 0, 2];

pub fn transaction_hash(tx: &Transaction, network: NetworkId) -> Result<TxHash, TransactionError> {
    transaction_hash_for_passphrase(tx, network.passphrase())
}

/// Hash against a raw passphrase, as received by a signer.
pub fn transaction_hash_for_passphrase(
    tx: &Transaction,
    passphrase: &str,
) -> Result<TxHash, TransactionError> {
    let body = bincode::serialize(tx).map_err(|e| TypesError::Encode(e.to_string()))?;
    let id = network_id(passphrase);
    Ok(TxHash::new(sha256_multi(&[&id, &ENVELOPE_TYPE_TX, &body])))
}
