//! Base-tokens command implementation.

use anyhow::{Context, Result};
use hooks_rs_engine::{CatalogConfig, TokenCatalogClient};
use hooks_rs_types::Token;

use crate::cli::{BaseTokensArgs, OutputFormat};
use crate::output::format_base_tokens_table;

pub async fn run_base_tokens(args: &BaseTokensArgs, format: OutputFormat) -> Result<()> {
    let client = match &args.catalog_url {
        Some(url) => {
            let url = url.parse::<url::Url>().context("invalid catalog URL")?;
            TokenCatalogClient::with_config(CatalogConfig::new().with_url(url))
        }
        None => TokenCatalogClient::new(),
    };

    let mut tokens: Vec<Token> = client
        .get_base_tokens()
        .await?
        .into_values()
        .filter(|token| match token {
            Token::Base(t) => t.network == args.network.0,
            Token::App(t) => t.network == args.network.0,
        })
        .collect();
    tokens.sort_by(|a, b| a.token_id().cmp(b.token_id()));

    match format {
        OutputFormat::Table => {
            println!("{}", format_base_tokens_table(&tokens));
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&tokens)?);
        }
    }

    Ok(())
}
