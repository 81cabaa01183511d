//! Position definitions emitted by hooks.
//!
//! Definitions are the unresolved form of a position: they name the tokens a
//! position is built from by reference, and defer anything that depends on
//! other tokens' resolution (price-per-share ratios, balances, display
//! metadata) behind [`MaybeComputed`] fields that the resolver evaluates once
//! the referenced tokens are available.

use std::fmt;

use alloy_chains::NamedChain;
use alloy_primitives::Address;

use crate::decimal::DecimalNumber;
use crate::display::DisplayProps;
use crate::token::{ResolvedTokens, TokenCategory};
use crate::token_id::{token_id, TokenId};
use crate::BoxError;

/// A field that is either a static value or a computation over the set of
/// already-resolved tokens.
pub enum MaybeComputed<T> {
    Static(T),
    Computed(Box<dyn Fn(&ResolvedTokens) -> Result<T, BoxError> + Send + Sync>),
}

impl<T: Clone> MaybeComputed<T> {
    /// Wrap a computation callback.
    pub fn computed<F>(f: F) -> Self
    where
        F: Fn(&ResolvedTokens) -> Result<T, BoxError> + Send + Sync + 'static,
    {
        Self::Computed(Box::new(f))
    }

    /// Evaluate the field against the resolved-token set.
    pub fn resolve(&self, tokens: &ResolvedTokens) -> Result<T, BoxError> {
        match self {
            Self::Static(value) => Ok(value.clone()),
            Self::Computed(f) => f(tokens),
        }
    }
}

impl<T> From<T> for MaybeComputed<T> {
    fn from(value: T) -> Self {
        Self::Static(value)
    }
}

impl<T: fmt::Debug> fmt::Debug for MaybeComputed<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(value) => f.debug_tuple("Static").field(value).finish(),
            Self::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

/// An unresolved reference to a token inside a definition's token list.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenReference {
    pub network: NamedChain,
    pub address: Address,
    /// Price to assume if the token ends up resolved through the generic
    /// ERC-20 fallback and the base-token catalog does not know it.
    pub fallback_price_usd: Option<DecimalNumber>,
    /// Category tag carried onto the resolved token (e.g. claimable rewards).
    pub category: Option<TokenCategory>,
}

impl TokenReference {
    pub fn new(network: NamedChain, address: Address) -> Self {
        Self {
            network,
            address,
            fallback_price_usd: None,
            category: None,
        }
    }

    pub fn with_fallback_price_usd(mut self, price: DecimalNumber) -> Self {
        self.fallback_price_usd = Some(price);
        self
    }

    pub fn with_category(mut self, category: TokenCategory) -> Self {
        self.category = Some(category);
        self
    }

    pub fn token_id(&self) -> TokenId {
        token_id(self.network, Some(self.address), None)
    }
}

/// Definition of an app token: a token whose value derives from a
/// price-per-share ratio over underlying tokens.
#[derive(Debug)]
pub struct AppTokenPositionDefinition {
    pub network: NamedChain,
    /// The token's own contract address, which is also its identity.
    pub address: Address,
    /// Underlying token references, one per price-per-share entry.
    pub tokens: Vec<TokenReference>,
    /// One ratio per underlying token.
    pub price_per_share: MaybeComputed<Vec<DecimalNumber>>,
    pub display_props: MaybeComputed<DisplayProps>,
}

impl AppTokenPositionDefinition {
    pub fn token_id(&self) -> TokenId {
        token_id(self.network, Some(self.address), None)
    }
}

/// Definition of a contract position: absolute balances held at a contract,
/// not represented by a token the holder owns.
#[derive(Debug)]
pub struct ContractPositionDefinition {
    pub network: NamedChain,
    pub address: Address,
    /// Disambiguates multiple positions sharing one contract address.
    pub extra_id: Option<String>,
    pub tokens: Vec<TokenReference>,
    /// One absolute (decimal) balance per underlying token.
    pub balances: MaybeComputed<Vec<DecimalNumber>>,
    pub display_props: MaybeComputed<DisplayProps>,
}

impl ContractPositionDefinition {
    pub fn token_id(&self) -> TokenId {
        token_id(self.network, Some(self.address), None)
    }

    /// Stable position identifier: the token id, suffixed with `:<extra_id>`
    /// when one is set.
    pub fn position_id(&self) -> String {
        match &self.extra_id {
            Some(extra) => format!("{}:{extra}", self.token_id()),
            None => self.token_id().into(),
        }
    }
}

/// A position definition produced by a hook.
#[derive(Debug)]
pub enum PositionDefinition {
    AppToken(AppTokenPositionDefinition),
    ContractPosition(ContractPositionDefinition),
}

impl PositionDefinition {
    pub fn network(&self) -> NamedChain {
        match self {
            Self::AppToken(d) => d.network,
            Self::ContractPosition(d) => d.network,
        }
    }

    pub fn address(&self) -> Address {
        match self {
            Self::AppToken(d) => d.address,
            Self::ContractPosition(d) => d.address,
        }
    }

    pub fn tokens(&self) -> &[TokenReference] {
        match self {
            Self::AppToken(d) => &d.tokens,
            Self::ContractPosition(d) => &d.tokens,
        }
    }

    pub fn token_id(&self) -> TokenId {
        match self {
            Self::AppToken(d) => d.token_id(),
            Self::ContractPosition(d) => d.token_id(),
        }
    }

    /// Stable position identifier: the token id, suffixed with `:<extra_id>`
    /// for contract positions that carry one.
    pub fn position_id(&self) -> String {
        match self {
            Self::AppToken(d) => d.token_id().into(),
            Self::ContractPosition(d) => d.position_id(),
        }
    }
}
