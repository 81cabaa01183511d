//! Base-token catalog client.
//!
//! The catalog is the price/metadata provider consulted first for every token
//! reference. It is fetched once per resolution run. Individual entries that
//! fail to parse are skipped rather than failing the whole catalog, since the
//! provider serves tokens for networks this engine does not support.

use std::collections::HashMap;

use alloy_chains::NamedChain;
use alloy_primitives::Address;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use hooks_rs_types::{token_id, BaseToken, DecimalNumber, ResolvedTokens, Token, TokenId};

use crate::error::{EngineError, Result};

/// Default base-token catalog endpoint.
pub const DEFAULT_CATALOG_URL: &str = "https://api.mainnet.valora.xyz/getTokensInfo";

/// Configuration for the catalog client.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Catalog URL.
    pub url: Url,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            url: Url::parse(DEFAULT_CATALOG_URL).expect("Invalid default catalog URL"),
        }
    }
}

impl CatalogConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a custom catalog URL.
    pub fn with_url(mut self, url: Url) -> Self {
        self.url = url;
        self
    }
}

/// One catalog entry as served. Prices are optional; a token without one is
/// kept with a zero price rather than dropped.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseTokenInfo {
    pub network: NamedChain,
    #[serde(default)]
    pub address: Option<Address>,
    pub symbol: String,
    pub decimals: u8,
    #[serde(default)]
    pub price_usd: Option<DecimalNumber>,
    #[serde(default)]
    pub is_native: Option<bool>,
}

impl BaseTokenInfo {
    pub fn token_id(&self) -> TokenId {
        token_id(self.network, self.address, self.is_native)
    }

    pub fn into_base_token(self) -> BaseToken {
        BaseToken {
            token_id: self.token_id(),
            network: self.network,
            address: self.address,
            symbol: self.symbol,
            decimals: self.decimals,
            price_usd: self.price_usd.unwrap_or_else(DecimalNumber::zero),
            balance: DecimalNumber::zero(),
            category: None,
        }
    }
}

/// Client for the base-token catalog.
#[derive(Debug, Clone)]
pub struct TokenCatalogClient {
    http_client: Client,
    config: CatalogConfig,
}

impl Default for TokenCatalogClient {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenCatalogClient {
    /// Create a client against the default endpoint.
    pub fn new() -> Self {
        Self {
            http_client: Client::new(),
            config: CatalogConfig::default(),
        }
    }

    /// Create a client with custom configuration.
    pub fn with_config(config: CatalogConfig) -> Self {
        Self {
            http_client: Client::new(),
            config,
        }
    }

    /// Fetch the full catalog, keyed by canonical [`TokenId`]. Malformed
    /// entries are logged at debug level and skipped.
    pub async fn get_base_tokens(&self) -> Result<ResolvedTokens> {
        let response = self
            .http_client
            .get(self.config.url.as_str())
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(EngineError::CatalogStatus {
                status: response.status().as_u16(),
            });
        }

        let raw: HashMap<String, serde_json::Value> = response.json().await?;
        let mut tokens = ResolvedTokens::with_capacity(raw.len());
        for (key, value) in raw {
            match serde_json::from_value::<BaseTokenInfo>(value) {
                Ok(info) => {
                    let token = info.into_base_token();
                    tokens.insert(token.token_id.clone(), Token::Base(token));
                }
                Err(e) => {
                    tracing::debug!(entry = %key, error = %e, "skipping malformed catalog entry");
                }
            }
        }
        Ok(tokens)
    }
}
