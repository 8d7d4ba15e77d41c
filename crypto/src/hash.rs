//! SHA-256 hashing for network ids and transaction payloads.

use sha2::{Digest, Sha256};

/// Compute SHA-256 of arbitrary data.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let mut output = [0u8; 32];
    output.copy_from_slice(&hasher.finalize());
    output
}

/// Hash several byte slices in sequence without concatenating them.
pub fn sha256_multi(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    let mut output = [0u8; 32];
    output.copy_from_slice(&hasher.finalize());
    output
}

/// The 32-byte network id mixed into every transaction hash.
pub fn network_id(passphrase: &str) -> [u8; 32] {
    sha256(passphrase.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_known_vector() {
        let h = sha256(b"abc");
        assert_eq!(
            h[..4],
            [0xba, 0x78, 0x16, 0xbf],
            "SHA-256(\"abc\") starts with ba7816bf"
        );
    }

    #[test]
    fn multi_equivalent_to_concatenation() {
        assert_eq!(sha256(b"helloworld"), sha256_multi(&[b"hello", b"world"]));
    }

    #[test]
    fn networks_hash_differently() {
        let test = network_id("Test SDF Network ; September 2015");
        let public = network_id("Public Global Stellar Network ; September 2015");
        assert_ne!(test, public);
    }
}
