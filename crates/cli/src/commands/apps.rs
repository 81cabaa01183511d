//! Apps command implementation.

use anyhow::Result;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

use crate::apps::Erc4626VaultHook;
use crate::cli::OutputFormat;

#[derive(Tabled)]
struct AppRow {
    #[tabled(rename = "App ID")]
    app_id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Description")]
    description: String,
}

pub fn run_apps(format: OutputFormat) -> Result<()> {
    let apps = vec![Erc4626VaultHook::app_info()];

    match format {
        OutputFormat::Table => {
            let rows: Vec<AppRow> = apps
                .iter()
                .map(|info| AppRow {
                    app_id: info.app_id.clone(),
                    name: info.name.clone(),
                    description: info.description.clone(),
                })
                .collect();
            let mut table = Table::new(rows);
            table
                .with(Style::rounded())
                .with(Modify::new(Rows::first()).with(Alignment::center()));
            println!("{}", table);
        }
        OutputFormat::Json => {
            let entries: Vec<serde_json::Value> = apps
                .iter()
                .map(|info| {
                    serde_json::json!({
                        "appId": info.app_id,
                        "name": info.name,
                        "description": info.description,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
    }

    Ok(())
}
