//! Core types for the hooks position engine.
//!
//! This crate holds everything the resolution engine and hook implementations
//! share: canonical token identity, the exact decimal number model used for
//! all valuation math, position definitions emitted by hooks, and the fully
//! resolved token/position records returned to callers.

pub mod decimal;
pub mod definition;
pub mod display;
pub mod token;
pub mod token_id;

/// Boxed error type for hook-provided computation callbacks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub use decimal::{DecimalNumber, SerializedDecimalNumber, MAX_SERIALIZED_DECIMALS};
pub use definition::{
    AppTokenPositionDefinition, ContractPositionDefinition, MaybeComputed, PositionDefinition,
    TokenReference,
};
pub use display::DisplayProps;
pub use token::{
    AppTokenPosition, BaseToken, ContractPosition, Position, ResolvedTokens, Token, TokenCategory,
};
pub use token_id::{native_asset_address, token_id, TokenId, SUPPORTED_NETWORKS};
