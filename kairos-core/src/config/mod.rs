//! Configuration types and parsing
//!
//! The firmware embeds a `clock.toml` and parses it at boot with
//! [`parse_config`].

pub mod toml;
pub mod types;

pub use toml::{parse_config, ParseError};
pub use types::*;
