//! hooks CLI - resolve DeFi positions across registered app hooks.

mod apps;
mod cli;
mod commands;
mod output;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use commands::{run_apps, run_base_tokens, run_positions};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Positions(args) => {
            run_positions(&args, cli.format).await?;
        }
        Commands::Apps => {
            run_apps(cli.format)?;
        }
        Commands::BaseTokens(args) => {
            run_base_tokens(&args, cli.format).await?;
        }
    }

    Ok(())
}
