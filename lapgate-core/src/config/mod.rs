//! Configuration types
//!
//! Board-agnostic rig configuration and the TOML reader that builds it.

pub mod parse;
pub mod types;

pub use parse::parse_config;
pub use types::*;
