//! Output formatting for the base-token catalog.

use hooks_rs_types::Token;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Tabled)]
struct TokenRow {
    #[tabled(rename = "Token ID")]
    token_id: String,
    #[tabled(rename = "Symbol")]
    symbol: String,
    #[tabled(rename = "Decimals")]
    decimals: u8,
    #[tabled(rename = "Price (USD)")]
    price_usd: String,
}

pub fn format_base_tokens_table(tokens: &[Token]) -> String {
    if tokens.is_empty() {
        return "No tokens found.".to_string();
    }

    let rows: Vec<TokenRow> = tokens
        .iter()
        .map(|t| TokenRow {
            token_id: t.token_id().to_string(),
            symbol: t.symbol().to_string(),
            decimals: t.decimals(),
            price_usd: format!("${}", t.price_usd().to_serialized()),
        })
        .collect();

    let mut table = Table::new(rows);
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));
    table.to_string()
}
