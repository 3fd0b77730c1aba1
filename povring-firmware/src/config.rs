//! Configuration loading
//!
//! The configuration is compiled in from `pov.toml` (validated by the
//! build script) and parsed at boot with the core's no_std parser.

use defmt::*;
use povring_core::config::{parse_config, PovConfig};

/// Embedded configuration (compiled into firmware)
/// Edit pov.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../pov.toml");

/// Parse the embedded configuration, falling back to defaults
pub fn load_config() -> PovConfig {
    match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!("Parsed embedded configuration successfully");
            info!(
                "Timing: wrap={}, {} ticks/us, min interval {}",
                config.timing.wrap_modulus,
                config.timing.ticks_per_us,
                config.timing.min_interval_ticks
            );
            config
        }
        Err(e) => {
            error!("Failed to parse embedded config: {:?}", e);
            warn!("Using default configuration");
            PovConfig::default()
        }
    }
}
