//! The app hook contract.
//!
//! Each protocol integration implements [`AppHook`] and registers itself in a
//! [`HookRegistry`](crate::registry::HookRegistry). The engine never knows
//! how a hook obtains its definitions; it only consumes the contract below.

use alloy_chains::NamedChain;
use alloy_primitives::Address;
use async_trait::async_trait;

use hooks_rs_types::{AppTokenPositionDefinition, PositionDefinition, TokenReference};

use crate::error::HookError;

/// Identity and display metadata for one app integration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppInfo {
    /// Stable identifier, unique across the registry (e.g. "ubeswap").
    pub app_id: String,
    /// Human-readable app name.
    pub name: String,
    /// One-line description of what the app is.
    pub description: String,
}

impl AppInfo {
    pub fn new(
        app_id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            app_id: app_id.into(),
            name: name.into(),
            description: description.into(),
        }
    }
}

/// One protocol integration.
#[async_trait]
pub trait AppHook: Send + Sync {
    /// The app's identity.
    fn info(&self) -> AppInfo;

    /// Definitions of every position this app offers on `network`. With an
    /// `address` the list is scoped to positions that holder participates
    /// in; without one it covers everything the app offers on the network.
    async fn get_position_definitions(
        &self,
        network: NamedChain,
        address: Option<Address>,
    ) -> Result<Vec<PositionDefinition>, HookError>;

    /// Definition of a single app token discovered as a dependency of some
    /// other position. Only required of hooks whose tokens appear inside
    /// other positions' token lists; the default refuses, which surfaces
    /// the missing implementation at resolution time.
    async fn get_app_token_definition(
        &self,
        reference: &TokenReference,
    ) -> Result<AppTokenPositionDefinition, HookError> {
        let _ = reference;
        Err(HookError::NotImplemented {
            app_id: self.info().app_id,
        })
    }
}
