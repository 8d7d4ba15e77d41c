//! Strkey encoding of account and contract ids.
//!
//! Layout: `version byte ‖ 32-byte payload ‖ CRC16-XModem(version ‖ payload)`,
//! checksum little-endian, the 35 bytes then base32-encoded (RFC 4648
//! alphabet, no padding) into 56 characters.
//!
//! Version bytes: `6 << 3` for Ed25519 accounts (`G...`), `2 << 3` for
//! contracts (`C...`).

use ballot_types::{AccountId, ContractId, PublicKey};

const ALPHABET: &[u8; 32] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";

/// Reverse lookup table: ASCII byte → 5-bit value (0xFF = invalid).
const DECODE: [u8; 128] = {
    let mut table = [0xFFu8; 128];
    let mut i = 0;
    while i < 32 {
        table[ALPHABET[i] as usize] = i as u8;
        i += 1;
    }
    table
};

const VERSION_ACCOUNT: u8 = 6 << 3;
const VERSION_CONTRACT: u8 = 2 << 3;
const RAW_LEN: usize = 35;

fn crc16_xmodem(data: &[u8]) -> u16 {
    let mut crc: u16 = 0;
    for &byte in data {
        crc ^= (byte as u16) << 8;
        for _ in 0..8 {
            crc = if crc & 0x8000 != 0 {
                (crc << 1) ^ 0x1021
            } else {
                crc << 1
            };
        }
    }
    crc
}

fn encode_base32(bytes: &[u8]) -> String {
    let mut out = String::with_capacity((bytes.len() * 8).div_ceil(5));
    let mut buffer: u64 = 0;
    let mut bits = 0;
    for &byte in bytes {
        buffer = (buffer << 8) | byte as u64;
        bits += 8;
        while bits >= 5 {
            bits -= 5;
            out.push(ALPHABET[((buffer >> bits) & 0x1F) as usize] as char);
        }
    }
    if bits > 0 {
        out.push(ALPHABET[((buffer << (5 - bits)) & 0x1F) as usize] as char);
    }
    out
}

fn decode_base32_fixed<const N: usize>(s: &str) -> Option<[u8; N]> {
    let mut buffer: u64 = 0;
    let mut bits = 0;
    let mut out = [0u8; N];
    let mut pos = 0;
    for c in s.bytes() {
        let val = *DECODE.get(c as usize)?;
        if val == 0xFF {
            return None;
        }
        buffer = (buffer << 5) | val as u64;
        bits += 5;
        if bits >= 8 {
            bits -= 8;
            if pos == N {
                return None;
            }
            out[pos] = (buffer >> bits) as u8;
            pos += 1;
        }
    }
    (pos == N).then_some(out)
}

fn encode_strkey(version: u8, payload: &[u8; 32]) -> String {
    let mut raw = [0u8; RAW_LEN];
    raw[0] = version;
    raw[1..33].copy_from_slice(payload);
    let crc = crc16_xmodem(&raw[..33]);
    raw[33..].copy_from_slice(&crc.to_le_bytes());
    encode_base32(&raw)
}

fn decode_strkey(version: u8, s: &str) -> Option<[u8; 32]> {
    let raw: [u8; RAW_LEN] = decode_base32_fixed(s)?;
    if raw[0] != version {
        return None;
    }
    let expected = crc16_xmodem(&raw[..33]).to_le_bytes();
    if raw[33..] != expected {
        return None;
    }
    let mut payload = [0u8; 32];
    payload.copy_from_slice(&raw[1..33]);
    Some(payload)
}

/// Derive the `G...` account id for a public key.
pub fn account_id_from_public_key(public_key: &PublicKey) -> AccountId {
    let encoded = encode_strkey(VERSION_ACCOUNT, public_key.as_bytes());
    // The encoder always yields a well-formed 56-char G-strkey.
    AccountId::parse(encoded).unwrap_or_else(|e| unreachable!("{e}"))
}

/// Derive the `C...` contract id for 32 contract-hash bytes.
pub fn contract_id_from_bytes(bytes: &[u8; 32]) -> ContractId {
    let encoded = encode_strkey(VERSION_CONTRACT, bytes);
    ContractId::parse(encoded).unwrap_or_else(|e| unreachable!("{e}"))
}

/// Extract and checksum-verify the public key behind an account id.
pub fn decode_account_id(id: &AccountId) -> Option<PublicKey> {
    decode_strkey(VERSION_ACCOUNT, id.as_str()).map(PublicKey)
}

pub fn decode_contract_id(id: &ContractId) -> Option<[u8; 32]> {
    decode_strkey(VERSION_CONTRACT, id.as_str())
}
