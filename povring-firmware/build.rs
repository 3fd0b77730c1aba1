//! Build script for povring-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates pov.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Character slots in one revolution: 60 columns of 5x7 glyphs plus gap
const BANNER_SLOTS: usize = 10;

/// TIM2 is a 16-bit counter
const CAPTURE_WRAP: i64 = 1 << 16;

/// TIM3 kernel clock in MHz
const TIMER_CLOCK_MHZ: i64 = 72;

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate pov.toml at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=pov.toml");

    let config_path = Path::new("pov.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: pov.toml not found!                                      ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds pov.toml from the povring-firmware          ║\n\
            ║  directory. Create one with [display] and [timing] sections.     ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read pov.toml                                  ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in pov.toml                          ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    validate_sections(&config);
    validate_display(&config);
    validate_timing(&config);

    println!("cargo:warning=pov.toml validated successfully");
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Panic with a boxed list of errors, if any
fn report(title: &str, errors: &[String]) {
    if errors.is_empty() {
        return;
    }
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title,
        errors
            .iter()
            .map(|e| format!("║  • {:<62} ║", e))
            .collect::<Vec<_>>()
            .join("\n")
    );
}

/// Only [display] and [timing] are understood, both optional
fn validate_sections(config: &toml::Value) {
    let mut errors = Vec::new();

    if let Some(table) = config.as_table() {
        for (name, value) in table {
            match name.as_str() {
                "display" | "timing" => {
                    if !value.is_table() {
                        errors.push(format!("[{}] must be a table", name));
                    }
                }
                _ => errors.push(format!("Unknown section or key '{}'", name)),
            }
        }
    }

    report("Invalid sections in pov.toml", &errors);
}

fn validate_display(config: &toml::Value) {
    let display = match config.get("display") {
        Some(toml::Value::Table(t)) => t,
        _ => return,
    };

    let mut errors = Vec::new();

    for (key, value) in display {
        match (key.as_str(), value) {
            ("banner", toml::Value::String(banner)) => {
                if banner.len() > BANNER_SLOTS {
                    errors.push(format!(
                        "[display] banner is longer than {} characters",
                        BANNER_SLOTS
                    ));
                }
                if !banner.bytes().all(|b| (b' '..=b'~').contains(&b)) {
                    errors.push("[display] banner must be printable ASCII".to_string());
                }
                if banner.contains('"') {
                    errors.push("[display] banner cannot contain '\"'".to_string());
                }
            }
            ("banner", _) => errors.push("[display] banner must be a string".to_string()),
            ("strobe", toml::Value::Boolean(_)) => {}
            ("strobe", _) => errors.push("[display] strobe must be true or false".to_string()),
            (other, _) => errors.push(format!("[display] unknown key '{}'", other)),
        }
    }

    report("Invalid display configuration", &errors);
}

fn validate_timing(config: &toml::Value) {
    let timing = match config.get("timing") {
        Some(toml::Value::Table(t)) => t,
        _ => return,
    };

    let mut errors = Vec::new();

    for (key, value) in timing {
        let max = match key.as_str() {
            "wrap_modulus" => u32::MAX as i64,
            "ticks_per_us" | "min_interval_ticks" => u16::MAX as i64,
            other => {
                errors.push(format!("[timing] unknown key '{}'", other));
                continue;
            }
        };

        let n = match value {
            toml::Value::Integer(n) if *n >= 1 && *n <= max => *n,
            toml::Value::Integer(_) => {
                errors.push(format!("[timing] {} must be 1-{}", key, max));
                continue;
            }
            _ => {
                errors.push(format!("[timing] {} must be an integer", key));
                continue;
            }
        };

        match key.as_str() {
            "wrap_modulus" if n != CAPTURE_WRAP => {
                errors.push(format!(
                    "[timing] wrap_modulus must be {} (16-bit TIM2)",
                    CAPTURE_WRAP
                ));
            }
            "ticks_per_us" if TIMER_CLOCK_MHZ % n != 0 => {
                errors.push(format!(
                    "[timing] ticks_per_us must divide {}",
                    TIMER_CLOCK_MHZ
                ));
            }
            _ => {}
        }
    }

    report("Invalid timing configuration", &errors);
}
