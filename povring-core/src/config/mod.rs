//! Configuration
//!
//! Types plus a parser for the small TOML subset the firmware embeds.

pub mod parser;
pub mod types;

pub use parser::{parse_config, ConfigError};
pub use types::*;
