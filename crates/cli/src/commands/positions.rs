//! Positions command implementation.

use std::sync::Arc;

use alloy_primitives::Address;
use anyhow::{Context, Result};
use hooks_rs_contracts::Erc20Reader;
use hooks_rs_engine::{CatalogConfig, HookRegistry, PositionEngine, RpcTokenReader, TokenCatalogClient};

use crate::apps::Erc4626VaultHook;
use crate::cli::{OutputFormat, PositionsArgs};
use crate::output::format_positions_table;

pub async fn run_positions(args: &PositionsArgs, format: OutputFormat) -> Result<()> {
    let network = args.network.0;

    let address = args
        .address
        .as_deref()
        .map(|s| s.parse::<Address>().context("invalid holder address"))
        .transpose()?;
    let vaults = args
        .vaults
        .iter()
        .map(|v| v.parse::<Address>())
        .collect::<Result<Vec<_>, _>>()
        .context("invalid vault address")?;

    let contract_reader = Erc20Reader::new(&args.rpc_url)?;

    let mut registry = HookRegistry::new();
    if !vaults.is_empty() {
        registry.register(Arc::new(Erc4626VaultHook::new(
            network,
            vaults,
            contract_reader.clone(),
        )));
    }

    let reader = RpcTokenReader::new().with_network(network, contract_reader);
    let mut engine = PositionEngine::new(registry, reader);
    if let Some(url) = &args.catalog_url {
        let url = url.parse::<url::Url>().context("invalid catalog URL")?;
        engine = engine.with_catalog(TokenCatalogClient::with_config(
            CatalogConfig::new().with_url(url),
        ));
    }

    let positions = engine.get_positions(network, address).await?;

    match format {
        OutputFormat::Table => {
            println!("{}", format_positions_table(&positions));
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&positions)?;
            println!("{}", json);
        }
    }

    Ok(())
}
