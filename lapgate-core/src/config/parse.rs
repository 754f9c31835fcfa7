//! Minimal TOML reader for the rig configuration
//!
//! Handles only the subset `rig.toml` needs and does not allocate:
//!
//! - `[section]` headers
//! - `key = value` with integers (decimal or `0x` hex), floats,
//!   booleans and double-quoted strings
//! - `#` comments, whole-line or trailing
//!
//! Keys that are absent keep their [`RigConfig::default`] values. The
//! result is validated before it is returned.

use super::types::{ConfigError, DisplayConfig, RigConfig};
use crate::timer::LapPolicy;

/// Section currently being read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    TimerDisplay,
    LapDisplay,
    Beam,
    Ranging,
    Lap,
}

/// A parsed scalar value
#[derive(Debug, Clone, Copy, PartialEq)]
enum Value<'a> {
    Int(i64),
    Float(f32),
    Bool(bool),
    Str(&'a str),
}

impl<'a> Value<'a> {
    fn parse(raw: &'a str) -> Option<Self> {
        if let Some(rest) = raw.strip_prefix('"') {
            return rest.strip_suffix('"').map(Value::Str);
        }

        match raw {
            "true" => return Some(Value::Bool(true)),
            "false" => return Some(Value::Bool(false)),
            _ => {}
        }

        let digits = strip_underscores(raw)?;
        if let Some(hex) = digits.strip_prefix("0x") {
            return i64::from_str_radix(hex, 16).ok().map(Value::Int);
        }
        if let Ok(int) = digits.parse::<i64>() {
            return Some(Value::Int(int));
        }
        digits.parse::<f32>().ok().map(Value::Float)
    }
}

/// Number literal with `_` digit separators removed, `None` if it is too long
fn strip_underscores(raw: &str) -> Option<heapless::String<32>> {
    let mut digits = heapless::String::new();
    for c in raw.chars().filter(|c| *c != '_') {
        digits.push(c).ok()?;
    }
    Some(digits)
}

/// Parse TOML text into a validated [`RigConfig`]
pub fn parse_config(input: &str) -> Result<RigConfig, ConfigError> {
    let mut config = RigConfig::default();
    let mut section = Section::Root;

    for (index, raw_line) in input.lines().enumerate() {
        let line = u16::try_from(index + 1).unwrap_or(u16::MAX);
        let text = strip_comment(raw_line).trim();

        if text.is_empty() {
            continue;
        }

        if let Some(header) = text.strip_prefix('[') {
            let name = header
                .strip_suffix(']')
                .ok_or(ConfigError::Syntax { line })?;
            section = parse_section(name.trim()).ok_or(ConfigError::UnknownSection { line })?;
            continue;
        }

        let (key, raw_value) = text.split_once('=').ok_or(ConfigError::Syntax { line })?;
        let value =
            Value::parse(raw_value.trim()).ok_or(ConfigError::InvalidValue { line })?;
        apply(&mut config, section, key.trim(), value, line)?;
    }

    config.validate()?;
    Ok(config)
}

/// Drop a `#` comment that is not inside a string
fn strip_comment(line: &str) -> &str {
    let mut in_string = false;
    for (i, c) in line.char_indices() {
        match c {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..i],
            _ => {}
        }
    }
    line
}

fn parse_section(name: &str) -> Option<Section> {
    match name {
        "timer_display" => Some(Section::TimerDisplay),
        "lap_display" => Some(Section::LapDisplay),
        "beam" => Some(Section::Beam),
        "ranging" => Some(Section::Ranging),
        "lap" => Some(Section::Lap),
        _ => None,
    }
}

fn apply(
    config: &mut RigConfig,
    section: Section,
    key: &str,
    value: Value<'_>,
    line: u16,
) -> Result<(), ConfigError> {
    let invalid = ConfigError::InvalidValue { line };

    match (section, key) {
        (Section::Root, "name") => {
            let Value::Str(s) = value else {
                return Err(invalid);
            };
            config.name.clear();
            config
                .name
                .push_str(s)
                .map_err(|_| ConfigError::NameTooLong)?;
        }
        (Section::Root, "poll_interval_ms") => config.poll_interval_ms = int(value, line)?,
        (Section::Root, "button_pin") => config.button_pin = int(value, line)?,

        (Section::TimerDisplay, _) => apply_display(&mut config.timer_display, key, value, line)?,
        (Section::LapDisplay, _) => apply_display(&mut config.lap_display, key, value, line)?,

        (Section::Beam, "pin") => config.beam.pin = int(value, line)?,
        (Section::Beam, "pull_up") => config.beam.pull_up = boolean(value, line)?,
        (Section::Beam, "debounce_us") => config.beam.debounce_us = int(value, line)?,

        (Section::Ranging, "address") => config.ranging.address = int(value, line)?,
        (Section::Ranging, "register") => config.ranging.register = int(value, line)?,
        (Section::Ranging, "sda_pin") => config.ranging.sda_pin = int(value, line)?,
        (Section::Ranging, "scl_pin") => config.ranging.scl_pin = int(value, line)?,
        (Section::Ranging, "frequency_hz") => config.ranging.frequency_hz = int(value, line)?,
        (Section::Ranging, "sample_period_us") => {
            config.ranging.sample_period_us = int(value, line)?
        }
        (Section::Ranging, "conversion_us") => config.ranging.conversion_us = int(value, line)?,
        (Section::Ranging, "motion_threshold_mps") => {
            config.ranging.motion_threshold_mps = match value {
                Value::Float(f) => f,
                Value::Int(i) => i as f32,
                _ => return Err(invalid),
            }
        }

        (Section::Lap, "policy") => {
            config.lap_policy = match value {
                Value::Str("restart") => LapPolicy::RestartOnLap,
                Value::Str("pause") => LapPolicy::PauseOnLap,
                _ => return Err(invalid),
            }
        }

        _ => return Err(ConfigError::UnknownKey { line }),
    }

    Ok(())
}

fn apply_display(
    display: &mut DisplayConfig,
    key: &str,
    value: Value<'_>,
    line: u16,
) -> Result<(), ConfigError> {
    match key {
        "clock_pin" => display.clock_pin = int(value, line)?,
        "data_pin" => display.data_pin = int(value, line)?,
        "bit_delay_us" => display.bit_delay_us = int(value, line)?,
        "brightness" => display.brightness = int(value, line)?,
        "refresh_brightness" => display.refresh_brightness = boolean(value, line)?,
        _ => return Err(ConfigError::UnknownKey { line }),
    }
    Ok(())
}

fn int<T: TryFrom<i64>>(value: Value<'_>, line: u16) -> Result<T, ConfigError> {
    match value {
        Value::Int(i) => T::try_from(i).map_err(|_| ConfigError::InvalidValue { line }),
        _ => Err(ConfigError::InvalidValue { line }),
    }
}

fn boolean(value: Value<'_>, line: u16) -> Result<bool, ConfigError> {
    match value {
        Value::Bool(b) => Ok(b),
        _ => Err(ConfigError::InvalidValue { line }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
# Timing gate at the bottom of the ramp
name = "ramp-gate"   # shown at boot
poll_interval_ms = 5

[lap]
policy = "pause"

[timer_display]
bit_delay_us = 5
brightness = 4
refresh_brightness = true

[beam]
debounce_us = 30_000

[ranging]
address = 0x29
motion_threshold_mps = 0.75
"#;

    #[test]
    fn test_parse_sample() {
        let config = parse_config(SAMPLE).unwrap();
        assert_eq!(config.name.as_str(), "ramp-gate");
        assert_eq!(config.poll_interval_ms, 5);
        assert_eq!(config.lap_policy, LapPolicy::PauseOnLap);
        assert_eq!(config.timer_display.bit_delay_us, 5);
        assert_eq!(config.timer_display.brightness, 4);
        assert!(config.timer_display.refresh_brightness);
        assert_eq!(config.beam.debounce_us, 30_000);
        assert_eq!(config.ranging.address, 0x29);
        assert_eq!(config.ranging.motion_threshold_mps, 0.75);

        // Untouched keys keep defaults
        assert_eq!(config.lap_display, DisplayConfig::LAP);
        assert_eq!(config.ranging.register, 0x05);
    }

    #[test]
    fn test_empty_input_gives_defaults() {
        assert_eq!(parse_config(""), Ok(RigConfig::default()));
    }

    #[test]
    fn test_unknown_section() {
        let err = parse_config("[heater]\nmax_temp = 55\n");
        assert_eq!(err, Err(ConfigError::UnknownSection { line: 1 }));
    }

    #[test]
    fn test_unknown_key_reports_line() {
        let err = parse_config("name = \"x\"\n\n[beam]\ncolour = 3\n");
        assert_eq!(err, Err(ConfigError::UnknownKey { line: 4 }));
    }

    #[test]
    fn test_wrong_type() {
        let err = parse_config("[beam]\npull_up = 1\n");
        assert_eq!(err, Err(ConfigError::InvalidValue { line: 2 }));

        let err = parse_config("[lap]\npolicy = \"sometimes\"\n");
        assert_eq!(err, Err(ConfigError::InvalidValue { line: 2 }));
    }

    #[test]
    fn test_value_out_of_type_range() {
        let err = parse_config("button_pin = 300\n");
        assert_eq!(err, Err(ConfigError::InvalidValue { line: 1 }));
    }

    #[test]
    fn test_overlong_number_is_rejected() {
        // 35 characters once the separators are gone
        let err = parse_config(
            "[ranging]\nmotion_threshold_mps = 1.000_000_000_000_000_000_000_000_000_000_000\n",
        );
        assert_eq!(err, Err(ConfigError::InvalidValue { line: 2 }));

        let err = parse_config("poll_interval_ms = 00000000000000000000000000000000010\n");
        assert_eq!(err, Err(ConfigError::InvalidValue { line: 1 }));
    }

    #[test]
    fn test_longest_number_still_parses() {
        // Exactly 32 characters once the separators are gone
        let config =
            parse_config("[beam]\ndebounce_us = 000000000000000000000000000_25_000\n").unwrap();
        assert_eq!(config.beam.debounce_us, 25_000);
    }

    #[test]
    fn test_bad_motion_threshold() {
        let err = parse_config("[ranging]\nmotion_threshold_mps = -1.0\n");
        assert_eq!(err, Err(ConfigError::InvalidThreshold));

        let err = parse_config("[ranging]\nmotion_threshold_mps = nan\n");
        assert_eq!(err, Err(ConfigError::InvalidThreshold));

        let err = parse_config("[ranging]\nmotion_threshold_mps = 0\n");
        assert_eq!(err, Err(ConfigError::InvalidThreshold));
    }

    #[test]
    fn test_missing_equals() {
        assert_eq!(
            parse_config("poll_interval_ms 10\n"),
            Err(ConfigError::Syntax { line: 1 })
        );
    }

    #[test]
    fn test_validation_runs_after_parse() {
        let err = parse_config("[lap_display]\nbrightness = 9\n");
        assert_eq!(err, Err(ConfigError::BrightnessOutOfRange));
    }

    #[test]
    fn test_hash_inside_string_is_kept() {
        let config = parse_config("name = \"gate#2\"\n").unwrap();
        assert_eq!(config.name.as_str(), "gate#2");
    }

    #[test]
    fn test_name_too_long() {
        let err = parse_config("name = \"a-very-long-rig-name-indeed\"\n");
        assert_eq!(err, Err(ConfigError::NameTooLong));
    }
}
