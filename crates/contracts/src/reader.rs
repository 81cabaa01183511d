//! Batched read client for standard fungible tokens.
//!
//! All multi-field reads are issued concurrently and awaited together, so
//! one logical "read the token" operation costs a single round-trip worth of
//! latency against the RPC endpoint.

use alloy::primitives::{Address, U256};
use url::Url;

use crate::erc20::IERC20;
use crate::erc4626::IERC4626;
use crate::error::{classify_call_error, ContractError, Result};
use crate::provider::{connect_http, ReadProvider};

/// Symbol and decimals of a fungible token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Erc20Metadata {
    pub symbol: String,
    pub decimals: u8,
}

/// On-chain state needed to resolve an app token: the holder's balance, the
/// total supply, and the token's own metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppTokenState {
    pub balance: U256,
    pub total_supply: U256,
    pub symbol: String,
    pub decimals: u8,
}

/// Read-only client for ERC-20 (and ERC-4626 view) calls.
#[derive(Debug, Clone)]
pub struct Erc20Reader {
    provider: ReadProvider,
}

impl Erc20Reader {
    /// Create a reader against an RPC endpoint.
    pub fn new(rpc_url: &str) -> Result<Self> {
        let url = rpc_url
            .parse::<Url>()
            .map_err(|e| ContractError::InvalidRpcUrl(e.to_string()))?;
        Ok(Self::from_url(url))
    }

    pub fn from_url(url: Url) -> Self {
        Self {
            provider: connect_http(url),
        }
    }

    /// Read a token's symbol and decimals.
    pub async fn metadata(&self, token: Address) -> Result<Erc20Metadata> {
        let contract = IERC20::new(token, &self.provider);
        let (symbol, decimals) = tokio::try_join!(
            async { contract.symbol().call().await.map_err(classify_call_error) },
            async { contract.decimals().call().await.map_err(classify_call_error) },
        )?;
        Ok(Erc20Metadata { symbol, decimals })
    }

    /// Read everything app-token resolution needs in one batch. Without a
    /// holder the balance read is skipped and reported as zero.
    pub async fn app_token_state(
        &self,
        token: Address,
        holder: Option<Address>,
    ) -> Result<AppTokenState> {
        let contract = IERC20::new(token, &self.provider);
        let (balance, total_supply, symbol, decimals) = tokio::try_join!(
            async {
                match holder {
                    Some(holder) => contract
                        .balanceOf(holder)
                        .call()
                        .await
                        .map_err(classify_call_error),
                    None => Ok(U256::ZERO),
                }
            },
            async {
                contract
                    .totalSupply()
                    .call()
                    .await
                    .map_err(classify_call_error)
            },
            async { contract.symbol().call().await.map_err(classify_call_error) },
            async { contract.decimals().call().await.map_err(classify_call_error) },
        )?;
        Ok(AppTokenState {
            balance,
            total_supply,
            symbol,
            decimals,
        })
    }

    /// Get the underlying asset address of an ERC-4626 vault.
    pub async fn vault_asset(&self, vault: Address) -> Result<Address> {
        let contract = IERC4626::new(vault, &self.provider);
        contract.asset().call().await.map_err(classify_call_error)
    }

    /// Convert a share amount to assets via an ERC-4626 vault.
    pub async fn convert_to_assets(&self, vault: Address, shares: U256) -> Result<U256> {
        let contract = IERC4626::new(vault, &self.provider);
        contract
            .convertToAssets(shares)
            .call()
            .await
            .map_err(classify_call_error)
    }
}
