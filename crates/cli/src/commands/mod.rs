//! Command implementations.

pub mod apps;
pub mod base_tokens;
pub mod positions;

pub use apps::run_apps;
pub use base_tokens::run_base_tokens;
pub use positions::run_positions;
