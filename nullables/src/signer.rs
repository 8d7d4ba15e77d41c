//! Nullable wallet signer.

use async_trait::async_trait;
use ballot_crypto::{account_id_from_public_key, keypair_from_seed};
use ballot_transactions::sign_envelope;
use ballot_types::codec::{from_wire, to_wire};
use ballot_types::{AccountId, KeyPair, TransactionEnvelope};
use ballot_wallet_core::{SignOptions, Signer, SignerError};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::lock;

/// How the signer answers `sign_transaction`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SignBehavior {
    /// Sign honestly with the voter key.
    Sign,
    /// The user rejects the request.
    Decline(String),
    /// Return bytes that are not an envelope.
    Garbage,
    /// Sign with a key other than the one it reports.
    WrongKey,
    /// Never answer within `Duration`.
    Stall(Duration),
}

pub struct NullSigner {
    keypair: KeyPair,
    account: AccountId,
    ready: AtomicBool,
    locked: AtomicBool,
    behavior: Mutex<SignBehavior>,
    sign_calls: AtomicUsize,
    last_options: Mutex<Option<SignOptions>>,
}

impl NullSigner {
    /// A ready, unlocked signer whose key derives from `seed`.
    pub fn from_seed(seed: [u8; 32]) -> Self {
        let keypair = keypair_from_seed(&seed);
        let account = account_id_from_public_key(&keypair.public);
        Self {
            keypair,
            account,
            ready: AtomicBool::new(true),
            locked: AtomicBool::new(false),
            behavior: Mutex::new(SignBehavior::Sign),
            sign_calls: AtomicUsize::new(0),
            last_options: Mutex::new(None),
        }
    }

    pub fn account(&self) -> &AccountId {
        &self.account
    }

    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::SeqCst);
    }

    /// A locked signer refuses to reveal its public key.
    pub fn set_locked(&self, locked: bool) {
        self.locked.store(locked, Ordering::SeqCst);
    }

    pub fn set_behavior(&self, behavior: SignBehavior) {
        *lock(&self.behavior) = behavior;
    }

    pub fn sign_calls(&self) -> usize {
        self.sign_calls.load(Ordering::SeqCst)
    }

    pub fn last_options(&self) -> Option<SignOptions> {
        lock(&self.last_options).clone()
    }

    fn sign_with(keypair: &KeyPair, wire: &str, options: &SignOptions) -> Result<String, SignerError> {
        let mut envelope: TransactionEnvelope =
            from_wire(wire).map_err(|e| SignerError::Malformed(e.to_string()))?;
        sign_envelope(&mut envelope, &options.network_passphrase, keypair)
            .map_err(|e| SignerError::Other(e.to_string()))?;
        to_wire(&envelope).map_err(|e| SignerError::Other(e.to_string()))
    }
}

#[async_trait]
impl Signer for NullSigner {
    async fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    async fn public_key(&self) -> Result<AccountId, SignerError> {
        if self.locked.load(Ordering::SeqCst) {
            return Err(SignerError::Locked);
        }
        Ok(self.account.clone())
    }

    async fn sign_transaction(
        &self,
        wire: &str,
        options: &SignOptions,
    ) -> Result<String, SignerError> {
        self.sign_calls.fetch_add(1, Ordering::SeqCst);
        *lock(&self.last_options) = Some(options.clone());
        let behavior = lock(&self.behavior).clone();
        match behavior {
            SignBehavior::Sign => Self::sign_with(&self.keypair, wire, options),
            SignBehavior::Decline(reason) => Err(SignerError::Declined(reason)),
            SignBehavior::Garbage => Ok("not-an-envelope".to_string()),
            SignBehavior::WrongKey => {
                let other = keypair_from_seed(&[0xEE; 32]);
                Self::sign_with(&other, wire, options)
            }
            SignBehavior::Stall(duration) => {
                tokio::time::sleep(duration).await;
                Self::sign_with(&self.keypair, wire, options)
            }
        }
    }
}
