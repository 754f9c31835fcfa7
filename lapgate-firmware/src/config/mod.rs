//! Configuration loading
//!
//! The rig configuration is compiled in from `rig.toml` and parsed by the
//! no_std reader in lapgate-core.

pub mod loader;

pub use loader::load_config;
