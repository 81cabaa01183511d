//! Resolved token and position records.
//!
//! These are the fully-priced forms the resolver produces: every price and
//! balance is an exact [`DecimalNumber`], and app tokens carry their full
//! underlying breakdown so valuations can be recomposed bottom-up.

use std::collections::HashMap;

use alloy_chains::NamedChain;
use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

use crate::decimal::DecimalNumber;
use crate::display::DisplayProps;
use crate::token_id::TokenId;

/// Category tag attached to an underlying token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenCategory {
    /// Claimable rewards rather than principal.
    Claimable,
}

/// Map of every token resolved so far in one resolution run, keyed by
/// [`TokenId`]. Computed definition fields receive this map.
pub type ResolvedTokens = HashMap<TokenId, Token>;

/// A terminal fungible token: symbol, decimals, price, balance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BaseToken {
    pub token_id: TokenId,
    pub network: NamedChain,
    /// Absent for a native asset with no ERC-20 representation.
    pub address: Option<Address>,
    pub symbol: String,
    pub decimals: u8,
    pub price_usd: DecimalNumber,
    pub balance: DecimalNumber,
    pub category: Option<TokenCategory>,
}

/// A resolved app token: a base token plus its underlying breakdown, supply,
/// and the price-per-share chain that links them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppTokenPosition {
    /// Equals the token id: app tokens never carry an extra id.
    pub position_id: String,
    pub token_id: TokenId,
    pub app_id: String,
    pub network: NamedChain,
    pub address: Address,
    pub symbol: String,
    pub decimals: u8,
    pub price_usd: DecimalNumber,
    pub balance: DecimalNumber,
    pub supply: DecimalNumber,
    pub price_per_share: Vec<DecimalNumber>,
    pub tokens: Vec<Token>,
    pub display: DisplayProps,
    pub category: Option<TokenCategory>,
}

impl AppTokenPosition {
    /// USD value of the held balance.
    pub fn balance_usd(&self) -> DecimalNumber {
        &self.balance * &self.price_usd
    }
}

/// A resolved token: either terminal or an app token with nested underlying
/// tokens. The recursive shape is what makes resolution order-sensitive.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Token {
    Base(BaseToken),
    App(Box<AppTokenPosition>),
}

impl Token {
    pub fn token_id(&self) -> &TokenId {
        match self {
            Self::Base(t) => &t.token_id,
            Self::App(t) => &t.token_id,
        }
    }

    pub fn symbol(&self) -> &str {
        match self {
            Self::Base(t) => &t.symbol,
            Self::App(t) => &t.symbol,
        }
    }

    pub fn decimals(&self) -> u8 {
        match self {
            Self::Base(t) => t.decimals,
            Self::App(t) => t.decimals,
        }
    }

    pub fn price_usd(&self) -> &DecimalNumber {
        match self {
            Self::Base(t) => &t.price_usd,
            Self::App(t) => &t.price_usd,
        }
    }

    pub fn balance(&self) -> &DecimalNumber {
        match self {
            Self::Base(t) => &t.balance,
            Self::App(t) => &t.balance,
        }
    }

    pub fn category(&self) -> Option<TokenCategory> {
        match self {
            Self::Base(t) => t.category,
            Self::App(t) => t.category,
        }
    }

    /// Attach a category tag if one is given, leaving the token's own tag in
    /// place otherwise.
    pub fn with_category(mut self, category: Option<TokenCategory>) -> Self {
        if category.is_some() {
            match &mut self {
                Self::Base(t) => t.category = category,
                Self::App(t) => t.category = category,
            }
        }
        self
    }

    /// Set this token's absolute balance and recompose the balances of any
    /// nested underlying tokens through the price-per-share chain.
    pub fn distribute_balance(&mut self, balance: &DecimalNumber) {
        match self {
            Self::Base(t) => t.balance = balance.clone(),
            Self::App(t) => {
                t.balance = balance.clone();
                for (child, ratio) in t.tokens.iter_mut().zip(&t.price_per_share) {
                    child.distribute_balance(&(balance * ratio));
                }
            }
        }
    }
}

/// A resolved contract position: absolute balances held at a contract.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContractPosition {
    pub position_id: String,
    pub token_id: TokenId,
    pub app_id: String,
    pub network: NamedChain,
    pub address: Address,
    pub extra_id: Option<String>,
    pub balance_usd: DecimalNumber,
    pub tokens: Vec<Token>,
    pub display: DisplayProps,
}

/// Final output record for one position definition.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Position {
    AppToken(AppTokenPosition),
    Contract(ContractPosition),
}

impl Position {
    pub fn position_id(&self) -> &str {
        match self {
            Self::AppToken(p) => &p.position_id,
            Self::Contract(p) => &p.position_id,
        }
    }

    pub fn app_id(&self) -> &str {
        match self {
            Self::AppToken(p) => &p.app_id,
            Self::Contract(p) => &p.app_id,
        }
    }

    pub fn network(&self) -> NamedChain {
        match self {
            Self::AppToken(p) => p.network,
            Self::Contract(p) => p.network,
        }
    }

    pub fn address(&self) -> Address {
        match self {
            Self::AppToken(p) => p.address,
            Self::Contract(p) => p.address,
        }
    }

    pub fn display(&self) -> &DisplayProps {
        match self {
            Self::AppToken(p) => &p.display,
            Self::Contract(p) => &p.display,
        }
    }

    /// USD value: held balance × price for app tokens, the accumulated
    /// balance sum for contract positions.
    pub fn value_usd(&self) -> DecimalNumber {
        match self {
            Self::AppToken(p) => p.balance_usd(),
            Self::Contract(p) => p.balance_usd.clone(),
        }
    }

    pub fn tokens(&self) -> &[Token] {
        match self {
            Self::AppToken(p) => &p.tokens,
            Self::Contract(p) => &p.tokens,
        }
    }
}
