//! Error types for hooks and the resolution engine.

use alloy_chains::NamedChain;
use thiserror::Error;

use hooks_rs_contracts::ContractError;
use hooks_rs_types::TokenId;

/// Errors a hook may return from its callbacks.
#[derive(Debug, Error)]
pub enum HookError {
    /// The hook does not recognize the token it was asked to resolve.
    #[error("hook does not recognize app token {token_id}")]
    UnknownAppToken { token_id: TokenId },

    /// The hook does not implement app-token lookups at all, yet one of its
    /// positions referenced an intermediary token. A configuration error.
    #[error("hook for app '{app_id}' does not implement app token lookups")]
    NotImplemented { app_id: String },

    /// An on-chain read failed.
    #[error(transparent)]
    Contract(#[from] ContractError),

    /// Any other hook-specific failure.
    #[error("{0}")]
    Message(String),
}

impl HookError {
    /// Whether a token-resolution failure may be recovered by treating the
    /// token as a plain fungible token. Only "the hook does not know this
    /// token" and "the call reverted" qualify; everything else is fatal.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::UnknownAppToken { .. } => true,
            Self::Contract(e) => e.is_reverted(),
            Self::NotImplemented { .. } | Self::Message(_) => false,
        }
    }
}

/// Errors that abort a whole resolution run.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The base-token catalog request failed.
    #[error("base token catalog request failed: {0}")]
    Catalog(#[from] reqwest::Error),

    /// The base-token catalog returned a non-success status.
    #[error("base token catalog returned HTTP {status}")]
    CatalogStatus { status: u16 },

    /// An on-chain read failed outside the recoverable fallback path.
    #[error(transparent)]
    Contract(#[from] ContractError),

    /// A definition is tagged with an app id that is not registered.
    #[error("no hook registered for app '{app_id}'")]
    UnknownApp { app_id: String },

    /// A hook failed to resolve an intermediary token and the failure was
    /// not one the fungible-token fallback covers.
    #[error("app '{app_id}' failed to resolve token {token_id}: {source}")]
    TokenResolution {
        app_id: String,
        token_id: TokenId,
        source: HookError,
    },

    /// A computed definition field returned an error.
    #[error("computed field failed for position {position_id}: {message}")]
    Compute {
        position_id: String,
        message: String,
    },

    /// A definition's token list and its per-token field disagree in length.
    #[error("position {position_id} lists {expected} tokens but {field} has {actual} entries")]
    TokenCountMismatch {
        position_id: String,
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A referenced token was never resolved. Indicates a bug in the
    /// resolution loop, not bad external data.
    #[error("referenced token {token_id} was never resolved")]
    MissingResolvedToken { token_id: TokenId },

    /// A discovered definition produced no position. Same class of bug as
    /// [`EngineError::MissingResolvedToken`].
    #[error("definition {position_id} was discovered but never resolved")]
    UnresolvedDefinition { position_id: String },

    /// The token reference graph contains a cycle.
    #[error("circular token reference through {token_id}")]
    CircularReference { token_id: TokenId },

    /// No RPC endpoint is configured for a referenced network.
    #[error("network {network} is not supported")]
    UnsupportedNetwork { network: NamedChain },
}

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
