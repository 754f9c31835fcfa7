//! Build script for lapgate-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates rig.toml at compile time

use std::collections::BTreeMap;
use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths and scripts
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Kind of value a key accepts
#[derive(Clone, Copy)]
enum Kind {
    /// Integer within an inclusive range
    Int(i64, i64),
    /// GPIO number
    Pin,
    /// GPIO number that only has one valid value on this board
    FixedPin(i64),
    /// Finite float above zero
    PositiveFloat,
    Bool,
    Str,
}

/// Known keys per section; `""` is the top level
fn schema() -> BTreeMap<&'static str, Vec<(&'static str, Kind)>> {
    let display = vec![
        ("clock_pin", Kind::Pin),
        ("data_pin", Kind::Pin),
        ("bit_delay_us", Kind::Int(1, 10_000)),
        ("brightness", Kind::Int(0, 7)),
        ("refresh_brightness", Kind::Bool),
    ];

    let mut schema = BTreeMap::new();
    schema.insert(
        "",
        vec![
            ("name", Kind::Str),
            ("poll_interval_ms", Kind::Int(1, 1_000)),
            ("button_pin", Kind::Pin),
        ],
    );
    schema.insert("lap", vec![("policy", Kind::Str)]);
    schema.insert("timer_display", display.clone());
    schema.insert("lap_display", display);
    schema.insert(
        "beam",
        vec![
            ("pin", Kind::Pin),
            ("pull_up", Kind::Bool),
            ("debounce_us", Kind::Int(1, u32::MAX as i64)),
        ],
    );
    schema.insert(
        "ranging",
        vec![
            ("address", Kind::Int(0x08, 0x77)),
            ("register", Kind::Int(0, 0xFF)),
            ("sda_pin", Kind::FixedPin(16)),
            ("scl_pin", Kind::FixedPin(17)),
            ("frequency_hz", Kind::Int(1_000, 1_000_000)),
            ("sample_period_us", Kind::Int(1, u32::MAX as i64)),
            ("conversion_us", Kind::Int(0, u32::MAX as i64)),
            ("motion_threshold_mps", Kind::PositiveFloat),
        ],
    );
    schema
}

/// Validate rig.toml configuration at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=rig.toml");

    let config_path = Path::new("rig.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: rig.toml not found!                                      ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds rig.toml from the lapgate-firmware          ║\n\
            ║  directory. Restore it or create a new one.                      ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read rig.toml                                  ║\n\
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
                ║  ERROR: Invalid TOML syntax in rig.toml                          ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();
    let mut pins: BTreeMap<i64, String> = BTreeMap::new();
    let schema = schema();

    let Some(root) = config.as_table() else {
        return;
    };

    for (key, value) in root {
        if let toml::Value::Table(table) = value {
            match schema.get(key.as_str()) {
                Some(keys) if !key.is_empty() => {
                    check_table(key, table, keys, &mut pins, &mut errors)
                }
                _ => errors.push(format!("unknown section [{}]", key)),
            }
        }
    }

    let top_level: toml::Table = root
        .iter()
        .filter(|(_, v)| !v.is_table())
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    check_table("", &top_level, &schema[""], &mut pins, &mut errors);

    if let Some(toml::Value::String(policy)) = config.get("lap").and_then(|l| l.get("policy")) {
        if !["restart", "pause"].contains(&policy.as_str()) {
            errors.push("[lap] policy must be 'restart' or 'pause'".to_string());
        }
    }

    if let Some(toml::Value::String(name)) = config.get("name") {
        if name.len() > 16 {
            errors.push("name must be at most 16 bytes".to_string());
        }
    }

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid rig configuration                                ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    println!("cargo:warning=rig.toml validated successfully");
}

/// Check one table's keys, value kinds and pin assignments
fn check_table(
    section: &str,
    table: &toml::Table,
    keys: &[(&str, Kind)],
    pins: &mut BTreeMap<i64, String>,
    errors: &mut Vec<String>,
) {
    let label = if section.is_empty() {
        String::from("top level")
    } else {
        format!("[{}]", section)
    };

    for (key, value) in table {
        let Some((_, kind)) = keys.iter().find(|(k, _)| *k == key.as_str()) else {
            errors.push(format!("{} unknown key '{}'", label, key));
            continue;
        };

        match (*kind, value) {
            (Kind::Int(min, max), toml::Value::Integer(i)) => {
                if *i < min || *i > max {
                    errors.push(format!("{} {} must be {}-{}", label, key, min, max));
                }
            }
            (Kind::Pin, toml::Value::Integer(pin)) => {
                if !(0..=29).contains(pin) {
                    errors.push(format!("{} {} must be GPIO 0-29", label, key));
                } else if let Some(owner) = pins.insert(*pin, format!("{} {}", label, key)) {
                    errors.push(format!("GPIO {} used by {} and {} {}", pin, owner, label, key));
                }
            }
            (Kind::FixedPin(fixed), toml::Value::Integer(pin)) => {
                if *pin != fixed {
                    errors.push(format!("{} {} is wired to GPIO {}", label, key, fixed));
                } else if let Some(owner) = pins.insert(*pin, format!("{} {}", label, key)) {
                    errors.push(format!("GPIO {} used by {} and {} {}", pin, owner, label, key));
                }
            }
            (Kind::PositiveFloat, toml::Value::Float(f)) => {
                if !f.is_finite() || *f <= 0.0 {
                    errors.push(format!("{} {} must be above zero", label, key));
                }
            }
            (Kind::PositiveFloat, toml::Value::Integer(i)) => {
                if *i <= 0 {
                    errors.push(format!("{} {} must be above zero", label, key));
                }
            }
            (Kind::Bool, toml::Value::Boolean(_)) => {}
            (Kind::Str, toml::Value::String(_)) => {}
            _ => errors.push(format!("{} {} has the wrong type", label, key)),
        }
    }
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
