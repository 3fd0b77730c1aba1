//! Parser for the display configuration file
//!
//! Handles the TOML subset the configuration uses:
//! - `[display]` and `[timing]` section headers
//! - `key = value` pairs (string, integer, boolean)
//! - Comments (`# ...`), including trailing ones
//!
//! Anything else (arrays, tables, multi-line strings) is not supported.
//! Keys that are missing keep their defaults.

use heapless::String;

use super::types::{PovConfig, MAX_BANNER_LEN};

/// Configuration parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Unknown or malformed section header
    InvalidSection,
    /// Key not recognised in its section
    UnknownKey,
    /// Value has the wrong type or is out of range
    InvalidValue,
    /// String value exceeds its capacity
    TooLong,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Display,
    Timing,
}

/// Parse configuration text into a [`PovConfig`]
pub fn parse_config(input: &str) -> Result<PovConfig, ConfigError> {
    let mut config = PovConfig::default();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            section = parse_section_header(&line[1..line.len() - 1])?;
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(ConfigError::InvalidValue)?;
        apply_value(section, key, value, &mut config)?;
    }

    Ok(config)
}

fn parse_section_header(header: &str) -> Result<Section, ConfigError> {
    match header.trim() {
        "display" => Ok(Section::Display),
        "timing" => Ok(Section::Timing),
        _ => Err(ConfigError::InvalidSection),
    }
}

fn apply_value(
    section: Section,
    key: &str,
    value: &str,
    config: &mut PovConfig,
) -> Result<(), ConfigError> {
    match (section, key) {
        (Section::Display, "banner") => {
            let text = parse_string(value)?;
            config.display.banner =
                String::<MAX_BANNER_LEN>::try_from(text).map_err(|_| ConfigError::TooLong)?;
        }
        (Section::Display, "strobe") => config.display.strobe = parse_bool(value)?,
        (Section::Timing, "wrap_modulus") => {
            config.timing.wrap_modulus = parse_nonzero(value)?;
        }
        (Section::Timing, "ticks_per_us") => {
            config.timing.ticks_per_us = parse_nonzero(value)?;
        }
        (Section::Timing, "min_interval_ticks") => {
            config.timing.min_interval_ticks = parse_nonzero(value)?;
        }
        _ => return Err(ConfigError::UnknownKey),
    }
    Ok(())
}

/// Parse "key = value" line
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = line[eq_pos + 1..].trim();

    // Strip a trailing comment unless the '#' sits inside a string
    let value = match value.find('#') {
        Some(hash_pos) if value[..hash_pos].matches('"').count() % 2 == 0 => {
            value[..hash_pos].trim()
        }
        _ => value,
    };

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

/// Parse a string value, quoted or bare
fn parse_string(value: &str) -> Result<&str, ConfigError> {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        Ok(&value[1..value.len() - 1])
    } else if value.contains('"') {
        Err(ConfigError::InvalidValue)
    } else {
        Ok(value)
    }
}

/// Parse a strictly positive integer; `_` separators are allowed
fn parse_nonzero<T>(value: &str) -> Result<T, ConfigError>
where
    T: core::str::FromStr + Default + PartialEq,
{
    let mut digits: String<24> = String::new();
    for c in value.chars().filter(|&c| c != '_') {
        digits.push(c).map_err(|_| ConfigError::InvalidValue)?;
    }
    let parsed: T = digits.parse().map_err(|_| ConfigError::InvalidValue)?;
    if parsed == T::default() {
        return Err(ConfigError::InvalidValue);
    }
    Ok(parsed)
}

/// Parse a boolean value
fn parse_bool(value: &str) -> Result<bool, ConfigError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ConfigError::InvalidValue),
    }
}
