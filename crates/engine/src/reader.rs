//! On-chain read seam used by the resolver.

use std::collections::HashMap;

use alloy_chains::NamedChain;
use alloy_primitives::Address;
use async_trait::async_trait;

use hooks_rs_contracts::{AppTokenState, Erc20Metadata, Erc20Reader};

use crate::error::{EngineError, Result};

/// The on-chain reads the resolver performs, abstracted over the networks a
/// deployment configures RPC endpoints for.
#[async_trait]
pub trait TokenReader: Send + Sync {
    /// Symbol and decimals of a fungible token.
    async fn metadata(&self, network: NamedChain, token: Address) -> Result<Erc20Metadata>;

    /// Balance, supply, and metadata batch for an app token. Without a
    /// holder the balance is zero.
    async fn app_token_state(
        &self,
        network: NamedChain,
        token: Address,
        holder: Option<Address>,
    ) -> Result<AppTokenState>;
}

/// [`TokenReader`] backed by one RPC endpoint per configured network.
#[derive(Debug, Default, Clone)]
pub struct RpcTokenReader {
    readers: HashMap<NamedChain, Erc20Reader>,
}

impl RpcTokenReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an RPC-backed reader for one network.
    pub fn with_network(mut self, network: NamedChain, reader: Erc20Reader) -> Self {
        self.readers.insert(network, reader);
        self
    }

    fn reader(&self, network: NamedChain) -> Result<&Erc20Reader> {
        self.readers
            .get(&network)
            .ok_or(EngineError::UnsupportedNetwork { network })
    }
}

#[async_trait]
impl TokenReader for RpcTokenReader {
    async fn metadata(&self, network: NamedChain, token: Address) -> Result<Erc20Metadata> {
        Ok(self.reader(network)?.metadata(token).await?)
    }

    async fn app_token_state(
        &self,
        network: NamedChain,
        token: Address,
        holder: Option<Address>,
    ) -> Result<AppTokenState> {
        Ok(self.reader(network)?.app_token_state(token, holder).await?)
    }
}
