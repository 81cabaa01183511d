//! CLI argument definitions using clap.

use std::str::FromStr;

use alloy_chains::NamedChain;
use clap::{Parser, Subcommand, ValueEnum};

/// hooks CLI - resolve DeFi positions
#[derive(Parser, Debug)]
#[command(name = "hooks")]
#[command(about = "CLI tool for resolving hook-defined DeFi positions", long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(long, global = true, default_value = "table")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve positions on a network, optionally scoped to a holder
    Positions(PositionsArgs),
    /// List the built-in app hooks
    Apps,
    /// List the base-token catalog for a network
    #[command(name = "base-tokens")]
    BaseTokens(BaseTokensArgs),
}

#[derive(Parser, Debug)]
pub struct PositionsArgs {
    /// Holder wallet address (omit to list every position the hooks offer)
    pub address: Option<String>,

    /// Network to query (e.g., celo, ethereum, base)
    #[arg(long, default_value = "celo")]
    pub network: NetworkArg,

    /// RPC URL for the network (can also use HOOKS_RPC_URL env var)
    #[arg(long, env = "HOOKS_RPC_URL", default_value = "https://forno.celo.org")]
    pub rpc_url: String,

    /// ERC-4626 vault address to resolve via the built-in vault hook
    /// (repeatable)
    #[arg(long = "vault")]
    pub vaults: Vec<String>,

    /// Base-token catalog URL (can also use HOOKS_CATALOG_URL env var)
    #[arg(long, env = "HOOKS_CATALOG_URL")]
    pub catalog_url: Option<String>,
}

#[derive(Parser, Debug)]
pub struct BaseTokensArgs {
    /// Network to filter the catalog to
    #[arg(long, default_value = "celo")]
    pub network: NetworkArg,

    /// Base-token catalog URL (can also use HOOKS_CATALOG_URL env var)
    #[arg(long, env = "HOOKS_CATALOG_URL")]
    pub catalog_url: Option<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Wrapper for NamedChain that implements FromStr with aliases
#[derive(Clone, Copy, Debug)]
pub struct NetworkArg(pub NamedChain);

impl FromStr for NetworkArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let network = match s.to_lowercase().as_str() {
            "celo" | "42220" => NamedChain::Celo,
            "celo-sepolia" | "11142220" => NamedChain::CeloSepolia,
            "ethereum" | "eth" | "mainnet" | "1" => NamedChain::Mainnet,
            "arbitrum" | "arb" | "42161" => NamedChain::Arbitrum,
            "optimism" | "op" | "10" => NamedChain::Optimism,
            "polygon" | "matic" | "137" => NamedChain::Polygon,
            "base" | "8453" => NamedChain::Base,
            _ => return Err(format!("Unknown network: {}", s)),
        };
        Ok(NetworkArg(network))
    }
}

impl std::fmt::Display for NetworkArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
