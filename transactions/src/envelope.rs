//! The three transaction stages and the signing helper shared by signers.

use ballot_crypto::{decode_account_id, sign_message, verify_signature};
use ballot_types::codec::{from_wire, to_wire};
use ballot_types::{
    AccountId, DecoratedSignature, KeyPair, NetworkId, Transaction, TransactionEnvelope, TxHash,
};

use crate::error::TransactionError;
use crate::hash::{transaction_hash, transaction_hash_for_passphrase};

/// A freshly built transaction. Not yet valid for submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnsignedTransaction {
    pub(crate) tx: Transaction,
    network: NetworkId,
}

impl UnsignedTransaction {
    pub(crate) fn new(tx: Transaction, network: NetworkId) -> Self {
        Self { tx, network }
    }

    pub fn tx(&self) -> &Transaction {
        &self.tx
    }

    pub fn network(&self) -> NetworkId {
        self.network
    }

    pub fn envelope(&self) -> TransactionEnvelope {
        TransactionEnvelope::unsigned(self.tx.clone())
    }

    pub fn to_wire(&self) -> Result<String, TransactionError> {
        Ok(to_wire(&self.envelope())?)
    }
}

/// An unsigned transaction carrying the resource data and auth entries from
/// a successful simulation. The only stage a signer should ever see.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreparedTransaction {
    tx: Transaction,
    network: NetworkId,
}

impl PreparedTransaction {
    pub(crate) fn new(tx: Transaction, network: NetworkId) -> Self {
        Self { tx, network }
    }

    pub fn tx(&self) -> &Transaction {
        &self.tx
    }

    pub fn network(&self) -> NetworkId {
        self.network
    }

    pub fn hash(&self) -> Result<TxHash, TransactionError> {
        transaction_hash(&self.tx, self.network)
    }

    /// Wire form handed to the signer.
    pub fn to_wire(&self) -> Result<String, TransactionError> {
        Ok(to_wire(&TransactionEnvelope::unsigned(self.tx.clone()))?)
    }
}

/// A signed envelope decoded from signer output and bound to a network.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedTransaction {
    envelope: TransactionEnvelope,
    network: NetworkId,
    hash: TxHash,
}

impl SignedTransaction {
    /// Decode a signed wire envelope for `network`.
    pub fn from_wire(wire: &str, network: NetworkId) -> Result<Self, TransactionError> {
        let envelope: TransactionEnvelope = from_wire(wire)?;
        let hash = transaction_hash(&envelope.tx, network)?;
        Ok(Self {
            envelope,
            network,
            hash,
        })
    }

    /// Check that this envelope signs exactly `prepared` and that at least
    /// one signature verifies against `signer`'s key.
    pub fn ensure_signs(
        &self,
        prepared: &PreparedTransaction,
        signer: &AccountId,
    ) -> Result<(), TransactionError> {
        let expected = prepared.hash()?;
        if self.hash != expected {
            return Err(TransactionError::HashMismatch {
                expected: expected.to_hex(),
                actual: self.hash.to_hex(),
            });
        }
        let public = decode_account_id(signer)
            .ok_or_else(|| TransactionError::UndecodableAccount(signer.to_string()))?;
        let hint = public.hint();
        let signed = self.envelope.signatures.iter().any(|sig| {
            sig.hint == hint && verify_signature(self.hash.as_bytes(), &sig.signature, &public)
        });
        if !signed {
            return Err(TransactionError::MissingSignature(signer.abbreviated()));
        }
        Ok(())
    }

    pub fn hash(&self) -> TxHash {
        self.hash
    }

    pub fn network(&self) -> NetworkId {
        self.network
    }

    pub fn envelope(&self) -> &TransactionEnvelope {
        &self.envelope
    }
}

/// Sign `envelope` for the network named by `passphrase`, appending a
/// decorated signature. Returns the signed hash.
pub fn sign_envelope(
    envelope: &mut TransactionEnvelope,
    passphrase: &str,
    keypair: &KeyPair,
) -> Result<TxHash, TransactionError> {
    let hash = transaction_hash_for_passphrase(&envelope.tx, passphrase)?;
    let signature = sign_message(hash.as_bytes(), &keypair.private);
    envelope.signatures.push(DecoratedSignature {
        hint: keypair.public.hint(),
        signature,
    });
    Ok(hash)
}
