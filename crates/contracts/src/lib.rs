//! Contract bindings and read clients for on-chain token state.
//!
//! This crate provides Solidity contract bindings and a batched read client
//! for the ERC-20 surface (plus ERC-4626 views) that position resolution
//! depends on.
//!
//! # Example
//!
//! ```no_run
//! use hooks_rs_contracts::Erc20Reader;
//! use alloy::primitives::Address;
//!
//! #[tokio::main]
//! async fn main() -> hooks_rs_contracts::Result<()> {
//!     let reader = Erc20Reader::new("https://forno.celo.org")?;
//!
//!     let token: Address = "0x765DE816845861e75A25fCA122bb6898B8B1282a".parse().unwrap();
//!     let metadata = reader.metadata(token).await?;
//!     println!("{} ({} decimals)", metadata.symbol, metadata.decimals);
//!
//!     Ok(())
//! }
//! ```

pub mod erc20;
pub mod erc4626;
pub mod error;
pub mod provider;
pub mod reader;

pub use error::{ContractError, Result};
pub use provider::{connect_http, ReadProvider};
pub use reader::{AppTokenState, Erc20Metadata, Erc20Reader};
