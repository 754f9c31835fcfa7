//! Embedded rig configuration

use defmt::*;

use lapgate_core::config::{parse_config, RigConfig};

/// Embedded configuration (compiled into firmware)
/// Edit rig.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../../rig.toml");

/// Parse the embedded configuration, falling back to defaults
///
/// The build script has already checked the file, so a failure here
/// means the two validators disagree.
pub fn load_config() -> RigConfig {
    match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!("Loaded rig config '{}'", config.name.as_str());
            config
        }
        Err(e) => {
            error!("rig.toml rejected ({}), using defaults", e);
            RigConfig::default()
        }
    }
}
