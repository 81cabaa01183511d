//! Canonical token identity.
//!
//! A token is identified within a network by the string key
//! `"<network>:<lowercased-address-or-'native'>"`. The network slug is the
//! canonical `NamedChain` display form (e.g. `celo`, `mainnet`, `base`).

use std::borrow::Borrow;
use std::fmt;

use alloy_chains::NamedChain;
use alloy_primitives::{address, Address};
use serde::{Deserialize, Serialize};

/// Networks the engine is deployed against.
pub const SUPPORTED_NETWORKS: &[NamedChain] = &[
    NamedChain::Celo,
    NamedChain::CeloSepolia,
    NamedChain::Mainnet,
    NamedChain::Arbitrum,
    NamedChain::Optimism,
    NamedChain::Polygon,
    NamedChain::Base,
];

/// Canonical network-scoped token identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TokenId(String);

impl TokenId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<TokenId> for String {
    fn from(id: TokenId) -> Self {
        id.0
    }
}

impl Borrow<str> for TokenId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Address of the network's native asset, for the networks where the native
/// asset is itself an ERC-20 token. Networks absent from this table identify
/// their native asset by an absent address only.
pub fn native_asset_address(network: NamedChain) -> Option<Address> {
    match network {
        // CELO is a predeploy at the same address on mainnet and the
        // Sepolia testnet.
        NamedChain::Celo | NamedChain::CeloSepolia => {
            Some(address!("471EcE3750Da237f93B8E339c536989b8978a438"))
        }
        _ => None,
    }
}

/// Derive the canonical [`TokenId`] for a token.
///
/// If `is_native` is not supplied it is derived by comparing `address`
/// against the network's native-asset address; an absent address is always
/// treated as native.
pub fn token_id(network: NamedChain, address: Option<Address>, is_native: Option<bool>) -> TokenId {
    let native = match address {
        None => true,
        Some(addr) => {
            is_native.unwrap_or_else(|| native_asset_address(network) == Some(addr))
        }
    };

    match (native, address) {
        (true, _) | (false, None) => TokenId(format!("{network}:native")),
        (false, Some(addr)) => TokenId(format!("{network}:{addr:#x}")),
    }
}
