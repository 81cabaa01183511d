//! Built-in hook for plain ERC-4626 vaults.

use alloy_chains::NamedChain;
use alloy_primitives::{Address, U256};
use async_trait::async_trait;

use hooks_rs_contracts::Erc20Reader;
use hooks_rs_engine::{AppHook, AppInfo, HookError};
use hooks_rs_types::{
    AppTokenPositionDefinition, DecimalNumber, DisplayProps, PositionDefinition, TokenReference,
};

pub const APP_ID: &str = "erc4626-vaults";

/// Exposes a configured list of ERC-4626 vaults as app-token positions: one
/// share is worth `convertToAssets(10^decimals)` of the underlying asset.
pub struct Erc4626VaultHook {
    network: NamedChain,
    vaults: Vec<Address>,
    reader: Erc20Reader,
}

impl Erc4626VaultHook {
    pub fn new(network: NamedChain, vaults: Vec<Address>, reader: Erc20Reader) -> Self {
        Self {
            network,
            vaults,
            reader,
        }
    }

    pub fn app_info() -> AppInfo {
        AppInfo::new(
            APP_ID,
            "ERC-4626 vaults",
            "Tokenized yield vaults implementing the ERC-4626 standard",
        )
    }

    async fn vault_definition(
        &self,
        vault: Address,
    ) -> Result<AppTokenPositionDefinition, HookError> {
        let metadata = self.reader.metadata(vault).await?;
        let asset = self.reader.vault_asset(vault).await?;
        let asset_decimals = self.reader.metadata(asset).await?.decimals;

        let one_share = U256::from(10u64).pow(U256::from(metadata.decimals));
        let assets = self.reader.convert_to_assets(vault, one_share).await?;
        let price_per_share = DecimalNumber::from_raw(assets, asset_decimals);

        Ok(AppTokenPositionDefinition {
            network: self.network,
            address: vault,
            tokens: vec![TokenReference::new(self.network, asset)],
            price_per_share: vec![price_per_share].into(),
            display_props: DisplayProps::new(
                format!("{} vault", metadata.symbol),
                "ERC-4626 yield vault",
            )
            .into(),
        })
    }
}

#[async_trait]
impl AppHook for Erc4626VaultHook {
    fn info(&self) -> AppInfo {
        Self::app_info()
    }

    async fn get_position_definitions(
        &self,
        network: NamedChain,
        _address: Option<Address>,
    ) -> Result<Vec<PositionDefinition>, HookError> {
        if network != self.network {
            return Ok(vec![]);
        }
        let mut definitions = Vec::with_capacity(self.vaults.len());
        for vault in &self.vaults {
            let definition = self.vault_definition(*vault).await?;
            definitions.push(PositionDefinition::AppToken(definition));
        }
        Ok(definitions)
    }

    async fn get_app_token_definition(
        &self,
        reference: &TokenReference,
    ) -> Result<AppTokenPositionDefinition, HookError> {
        if reference.network == self.network && self.vaults.contains(&reference.address) {
            self.vault_definition(reference.address).await
        } else {
            Err(HookError::UnknownAppToken {
                token_id: reference.token_id(),
            })
        }
    }
}
