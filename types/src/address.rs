//! Account and contract identifiers in strkey form.
//!
//! Account ids start with `G`, contract ids with `C`. Both are 56 characters
//! of RFC 4648 base32. Only the shape is checked here; checksum validation and
//! derivation from key bytes live in `ballot-crypto`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TypesError;

/// Length of an encoded strkey (1 version byte + 32 payload + 2 checksum = 35 bytes).
pub const STRKEY_LEN: usize = 56;

fn is_base32(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_uppercase() || (b'2'..=b'7').contains(&b))
}

fn well_formed(s: &str, prefix: char) -> bool {
    s.len() == STRKEY_LEN && s.starts_with(prefix) && is_base32(s)
}

/// The public identity of a ledger account (a `G...` strkey).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AccountId(String);

impl AccountId {
    pub const PREFIX: char = 'G';

    /// Parse an account id, checking prefix, length and alphabet.
    pub fn parse(raw: impl Into<String>) -> Result<Self, TypesError> {
        let s = raw.into();
        if !well_formed(&s, Self::PREFIX) {
            return Err(TypesError::InvalidAccountId(s));
        }
        Ok(Self(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short `GABC...WXYZ` form for logs and terminal output.
    pub fn abbreviated(&self) -> String {
        format!("{}...{}", &self.0[..6], &self.0[self.0.len() - 4..])
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for AccountId {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// The address of a deployed smart contract (a `C...` strkey).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContractId(String);

impl ContractId {
    pub const PREFIX: char = 'C';

    pub fn parse(raw: impl Into<String>) -> Result<Self, TypesError> {
        let s = raw.into();
        if !well_formed(&s, Self::PREFIX) {
            return Err(TypesError::InvalidContractId(s));
        }
        Ok(Self(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContractId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ContractId {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
