//! Output formatting for resolved positions.

use colored::Colorize;
use hooks_rs_types::{DecimalNumber, Position};
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Tabled)]
struct PositionRow {
    #[tabled(rename = "App")]
    app: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Network")]
    network: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "Balance")]
    balance: String,
    #[tabled(rename = "Value (USD)")]
    value_usd: String,
}

fn truncate_address(addr: &str) -> String {
    let len = addr.chars().count();
    if len > 10 {
        let head: String = addr.chars().take(6).collect();
        let tail: String = addr.chars().skip(len - 4).collect();
        format!("{head}...{tail}")
    } else {
        addr.to_string()
    }
}

// Counts chars, not bytes: display titles come from hook data and may
// contain multibyte characters.
fn truncate_name(name: &str, max_len: usize) -> String {
    if name.chars().count() > max_len {
        let kept: String = name.chars().take(max_len - 3).collect();
        format!("{kept}...")
    } else {
        name.to_string()
    }
}

/// Dollar formatting for the table view only; exact values go out through
/// the JSON path.
fn format_usd(value: &DecimalNumber) -> String {
    let v: f64 = value.to_serialized().as_str().parse().unwrap_or(0.0);
    if v >= 1_000_000.0 {
        format!("${:.2}M", v / 1_000_000.0)
    } else if v >= 1_000.0 {
        format!("${:.2}K", v / 1_000.0)
    } else {
        format!("${:.2}", v)
    }
}

pub fn format_positions_table(positions: &[Position]) -> String {
    if positions.is_empty() {
        return "No positions found.".to_string();
    }

    let mut total = DecimalNumber::zero();
    let rows: Vec<PositionRow> = positions
        .iter()
        .map(|p| {
            let value = p.value_usd();
            total += &value;
            PositionRow {
                app: p.app_id().to_string(),
                kind: match p {
                    Position::AppToken(_) => "app-token".to_string(),
                    Position::Contract(_) => "contract".to_string(),
                },
                network: p.network().to_string(),
                title: truncate_name(&p.display().title, 30),
                address: truncate_address(&format!("{:#x}", p.address())),
                balance: match p {
                    Position::AppToken(a) => a.balance.to_serialized().to_string(),
                    Position::Contract(_) => "-".to_string(),
                },
                value_usd: format_usd(&value),
            }
        })
        .collect();

    let mut table = Table::new(rows);
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));

    format!("{}\n{} {}", table, "Total:".bold(), format_usd(&total))
}
