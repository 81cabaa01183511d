//! Provider type definitions for read-only contract clients.

use alloy::network::Ethereum;
use alloy::providers::RootProvider;
use url::Url;

/// The concrete provider type used by read clients. The engine only ever
/// reads, so no wallet or fill layers are attached.
pub type ReadProvider = RootProvider<Ethereum>;

/// Connect a read-only HTTP provider to an RPC endpoint.
pub fn connect_http(url: Url) -> ReadProvider {
    RootProvider::new_http(url)
}
