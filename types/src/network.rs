//! Network identifier and passphrase.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TypesError;

/// Which ledger network transactions are built for.
///
/// The passphrase is hashed into every transaction hash, so a transaction
/// signed for one network is invalid on every other.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkId {
    /// The production network.
    Public,
    /// The public test network.
    Testnet,
    /// The preview network for upcoming protocol versions.
    Futurenet,
    /// A local standalone node.
    Standalone,
}

impl NetworkId {
    pub fn passphrase(&self) -> &'static str {
        match self {
            Self::Public => "Public Global Stellar Network ; September 2015",
            Self::Testnet => "Test SDF Network ; September 2015",
            Self::Futurenet => "Test SDF Future Network ; October 2022",
            Self::Standalone => "Standalone Network ; February 2017",
        }
    }

    /// Network name as understood by browser-extension signers.
    pub fn signer_name(&self) -> &'static str {
        match self {
            Self::Public => "PUBLIC",
            Self::Testnet => "TESTNET",
            Self::Futurenet => "FUTURENET",
            Self::Standalone => "STANDALONE",
        }
    }

    /// Default RPC endpoint for hosted networks.
    pub fn default_rpc_url(&self) -> &'static str {
        match self {
            Self::Public => "https://mainnet.sorobanrpc.com",
            Self::Testnet => "https://soroban-testnet.stellar.org",
            Self::Futurenet => "https://rpc-futurenet.stellar.org",
            Self::Standalone => "http://localhost:8000/soroban/rpc",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Testnet => "testnet",
            Self::Futurenet => "futurenet",
            Self::Standalone => "standalone",
        }
    }
}

impl fmt::Display for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NetworkId {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "public" | "mainnet" => Ok(Self::Public),
            "testnet" | "test" => Ok(Self::Testnet),
            "futurenet" => Ok(Self::Futurenet),
            "standalone" | "local" => Ok(Self::Standalone),
            other => Err(TypesError::UnknownNetwork(other.to_string())),
        }
    }
}
