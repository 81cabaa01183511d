//! Built-in app hooks.

pub mod erc4626;

pub use erc4626::Erc4626VaultHook;
