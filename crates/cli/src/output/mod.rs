//! Output formatting for CLI results.

pub mod base_tokens;
pub mod positions;

pub use base_tokens::format_base_tokens_table;
pub use positions::format_positions_table;
