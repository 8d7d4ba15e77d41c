//! Argon2id encrypted keystore for the voter's Ed25519 seed.
//!
//! 1. Argon2id derives a 32-byte key from the password and a random salt.
//! 2. AES-256-GCM encrypts the seed under a random nonce.
//! 3. Everything needed to decrypt, plus the public account id, is stored
//!    as JSON.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use argon2::{Algorithm, Argon2, Params, Version};
use ballot_types::AccountId;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::path::Path;
use zeroize::Zeroizing;

use crate::error::KeystoreError;

const KEYSTORE_VERSION: u32 = 1;
const SALT_LEN: usize = 32;
const NONCE_LEN: usize = 12;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct KeystoreFile {
    pub version: u32,
    /// Public account id of the stored key. Not secret.
    pub account: AccountId,
    pub crypto: KeystoreCrypto,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct KeystoreCrypto {
    pub cipher: String,
    pub kdf: String,
    pub kdf_params: KdfParams,
    /// Hex-encoded salt.
    pub salt: String,
    /// Hex-encoded nonce.
    pub nonce: String,
    /// Hex-encoded ciphertext.
    pub ciphertext: String,
}

/// Argon2id cost parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KdfParams {
    /// Memory in KiB.
    pub memory: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for KdfParams {
    /// 64 MiB, 3 passes, 1 lane.
    fn default() -> Self {
        Self {
            memory: 65536,
            iterations: 3,
            parallelism: 1,
        }
    }
}

/// Encrypt a 32-byte seed with the default cost parameters.
pub fn encrypt_keystore(
    seed: &[u8; 32],
    account: AccountId,
    password: &str,
) -> Result<KeystoreFile, KeystoreError> {
    encrypt_keystore_with_params(seed, account, password, KdfParams::default())
}

pub fn encrypt_keystore_with_params(
    seed: &[u8; 32],
    account: AccountId,
    password: &str,
    params: KdfParams,
) -> Result<KeystoreFile, KeystoreError> {
    let mut rng = rand::thread_rng();
    let mut salt = [0u8; SALT_LEN];
    rng.fill_bytes(&mut salt);
    let mut nonce_bytes = [0u8; NONCE_LEN];
    rng.fill_bytes(&mut nonce_bytes);

    let key = derive_key(password, &salt, params)?;
    let cipher = Aes256Gcm::new_from_slice(&key[..])
        .map_err(|e| KeystoreError::Encrypt(e.to_string()))?;
    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce_bytes), &seed[..])
        .map_err(|e| KeystoreError::Encrypt(e.to_string()))?;

    Ok(KeystoreFile {
        version: KEYSTORE_VERSION,
        account,
        crypto: KeystoreCrypto {
            cipher: "aes-256-gcm".to_string(),
            kdf: "argon2id".to_string(),
            kdf_params: params,
            salt: hex::encode(salt),
            nonce: hex::encode(nonce_bytes),
            ciphertext: hex::encode(ciphertext),
        },
    })
}

/// Decrypt the seed. The returned buffer is zeroized on drop.
pub fn decrypt_keystore(
    keystore: &KeystoreFile,
    password: &str,
) -> Result<Zeroizing<[u8; 32]>, KeystoreError> {
    if keystore.version != KEYSTORE_VERSION {
        return Err(KeystoreError::UnsupportedVersion(keystore.version));
    }

    let salt = decode_field("salt", &keystore.crypto.salt)?;
    let nonce_bytes = decode_field("nonce", &keystore.crypto.nonce)?;
    let ciphertext = decode_field("ciphertext", &keystore.crypto.ciphertext)?;
    if nonce_bytes.len() != NONCE_LEN {
        return Err(KeystoreError::InvalidField {
            field: "nonce",
            reason: format!("expected {NONCE_LEN} bytes, got {}", nonce_bytes.len()),
        });
    }

    let key = derive_key(password, &salt, keystore.crypto.kdf_params)?;
    let cipher = Aes256Gcm::new_from_slice(&key[..]).map_err(|_| KeystoreError::Decrypt)?;
    let plaintext = Zeroizing::new(
        cipher
            .decrypt(Nonce::from_slice(&nonce_bytes), ciphertext.as_slice())
            .map_err(|_| KeystoreError::Decrypt)?,
    );

    if plaintext.len() != 32 {
        return Err(KeystoreError::InvalidField {
            field: "ciphertext",
            reason: format!("decrypted seed has {} bytes", plaintext.len()),
        });
    }
    let mut seed = Zeroizing::new([0u8; 32]);
    seed.copy_from_slice(&plaintext);
    Ok(seed)
}

pub fn save_keystore(keystore: &KeystoreFile, path: &Path) -> Result<(), KeystoreError> {
    let json = serde_json::to_string_pretty(keystore)?;
    std::fs::write(path, json)?;
    Ok(())
}

pub fn load_keystore(path: &Path) -> Result<KeystoreFile, KeystoreError> {
    let json = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

fn derive_key(
    password: &str,
    salt: &[u8],
    params: KdfParams,
) -> Result<Zeroizing<[u8; 32]>, KeystoreError> {
    let params = Params::new(params.memory, params.iterations, params.parallelism, Some(32))
        .map_err(|e| KeystoreError::Kdf(e.to_string()))?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
    let mut output = Zeroizing::new([0u8; 32]);
    argon2
        .hash_password_into(password.as_bytes(), salt, &mut output[..])
        .map_err(|e| KeystoreError::Kdf(e.to_string()))?;
    Ok(output)
}

fn decode_field(field: &'static str, value: &str) -> Result<Vec<u8>, KeystoreError> {
    hex::decode(value).map_err(|e| KeystoreError::InvalidField {
        field,
        reason: e.to_string(),
    })
}
