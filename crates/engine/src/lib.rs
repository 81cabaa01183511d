//! Position resolution engine for hook-defined DeFi positions.
//!
//! Protocol integrations ("hooks") describe positions declaratively: an app
//! token is worth a price-per-share ratio over underlying tokens, a contract
//! position is a set of absolute balances held at a contract. Underlying
//! tokens may themselves be app tokens from another hook, so the full token
//! graph is only known by walking it. This crate owns that walk:
//!
//! - [`HookRegistry`] holds the statically registered [`AppHook`]
//!   implementations.
//! - [`TokenCatalogClient`] fetches the base-token price/metadata catalog
//!   consulted first for every token reference.
//! - [`TokenReader`] abstracts the on-chain ERC-20 reads, with
//!   [`RpcTokenReader`] as the RPC-backed implementation.
//! - [`PositionEngine`] ties them together: it discovers the transitive
//!   closure of token references, resolves each to concrete
//!   symbol/decimals/price, then recomposes USD valuations and balances
//!   bottom-up through nested price-per-share chains using exact decimal
//!   arithmetic.
//!
//! A hook that fails to list its positions only loses its own positions;
//! failures inside the shared resolution mechanics fail the whole request.

pub mod catalog;
pub mod error;
pub mod hook;
pub mod reader;
pub mod registry;
pub mod resolver;

pub use catalog::{BaseTokenInfo, CatalogConfig, TokenCatalogClient, DEFAULT_CATALOG_URL};
pub use error::{EngineError, HookError, Result};
pub use hook::{AppHook, AppInfo};
pub use reader::{RpcTokenReader, TokenReader};
pub use registry::HookRegistry;
pub use resolver::PositionEngine;
