//! A [`Signer`] backed by a key decrypted from a local keystore.
//!
//! Used by the CLI, where there is no wallet extension to delegate to. The
//! key never leaves this type; requests arrive and leave as wire envelopes.

use async_trait::async_trait;
use ballot_crypto::{account_id_from_public_key, keypair_from_seed};
use ballot_transactions::sign_envelope;
use ballot_types::codec::{from_wire, to_wire};
use ballot_types::{AccountId, KeyPair, NetworkId, TransactionEnvelope};
use std::path::Path;
use tracing::{debug, info};

use crate::error::{KeystoreError, SignerError};
use crate::keystore::{decrypt_keystore, load_keystore};
use crate::signer::{SignOptions, Signer};

pub struct LocalSigner {
    keypair: KeyPair,
    account: AccountId,
    network: NetworkId,
}

impl LocalSigner {
    /// Build a signer from a raw seed. It refuses requests for any network
    /// other than `network`.
    pub fn from_seed(seed: &[u8; 32], network: NetworkId) -> Self {
        let keypair = keypair_from_seed(seed);
        let account = account_id_from_public_key(&keypair.public);
        Self {
            keypair,
            account,
            network,
        }
    }

    /// Load and decrypt a keystore file.
    pub fn from_keystore(
        path: &Path,
        password: &str,
        network: NetworkId,
    ) -> Result<Self, KeystoreError> {
        let keystore = load_keystore(path)?;
        let seed = decrypt_keystore(&keystore, password)?;
        let signer = Self::from_seed(&seed, network);
        if signer.account != keystore.account {
            return Err(KeystoreError::InvalidField {
                field: "account",
                reason: format!(
                    "stored {} but key derives {}",
                    keystore.account, signer.account
                ),
            });
        }
        info!(account = %signer.account.abbreviated(), "keystore unlocked");
        Ok(signer)
    }

    pub fn account(&self) -> &AccountId {
        &self.account
    }
}

#[async_trait]
impl Signer for LocalSigner {
    async fn is_ready(&self) -> bool {
        true
    }

    async fn public_key(&self) -> Result<AccountId, SignerError> {
        Ok(self.account.clone())
    }

    async fn sign_transaction(
        &self,
        wire: &str,
        options: &SignOptions,
    ) -> Result<String, SignerError> {
        if options.network_passphrase != self.network.passphrase() {
            return Err(SignerError::Declined(format!(
                "signer is bound to {}, request is for {}",
                self.network.signer_name(),
                options.network
            )));
        }
        let mut envelope: TransactionEnvelope =
            from_wire(wire).map_err(|e| SignerError::Malformed(e.to_string()))?;
        let hash = sign_envelope(&mut envelope, &options.network_passphrase, &self.keypair)
            .map_err(|e| SignerError::Other(e.to_string()))?;
        debug!(%hash, "signed locally");
        to_wire(&envelope).map_err(|e| SignerError::Other(e.to_string()))
    }
}
