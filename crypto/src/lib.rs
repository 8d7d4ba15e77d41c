//! Cryptographic primitives for ballot.
//!
//! - **Ed25519** for transaction signatures
//! - **SHA-256** for network ids and transaction hashes
//! - Strkey encoding for `G...` account ids and `C...` contract ids

pub mod address;
pub mod hash;
pub mod keys;
pub mod sign;

pub use address::{
    account_id_from_public_key, contract_id_from_bytes, decode_account_id, decode_contract_id,
};
pub use hash::{network_id, sha256, sha256_multi};
pub use keys::{generate_keypair, keypair_from_seed, public_from_private};
pub use sign::{sign_message, verify_signature};
