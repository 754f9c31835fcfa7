//! Rig configuration types
//!
//! Defaults reproduce the wiring of the reference rig: timer display on
//! GPIO 19/18, lap display on GPIO 21/20, beam gate on GPIO 4, rangefinder
//! on I2C0 (GPIO 16/17) and the mode button on GPIO 15.

use heapless::{FnvIndexSet, String};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::debounce::DEFAULT_DEBOUNCE_US;
use crate::speed::{DEFAULT_CONVERSION_US, DEFAULT_MOTION_THRESHOLD_MPS, DEFAULT_SAMPLE_PERIOD_US};
use crate::timer::LapPolicy;
use crate::traits::display::MAX_BRIGHTNESS;

/// Maximum length of the rig name
pub const MAX_NAME_LEN: usize = 16;

/// Highest GPIO number on the RP2040
pub const MAX_GPIO: u8 = 29;

/// I2C0 data GPIO the rangefinder is wired to
pub const I2C_SDA_PIN: u8 = 16;

/// I2C0 clock GPIO the rangefinder is wired to
pub const I2C_SCL_PIN: u8 = 17;

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Line is neither a section header nor `key = value`
    Syntax { line: u16 },
    /// Unknown `[section]`
    UnknownSection { line: u16 },
    /// Key not valid in its section
    UnknownKey { line: u16 },
    /// Value has the wrong type or does not fit
    InvalidValue { line: u16 },
    /// Rig name longer than [`MAX_NAME_LEN`]
    NameTooLong,
    /// Brightness above 7
    BrightnessOutOfRange,
    /// Bit-hold delay of zero
    ZeroBitDelay,
    /// A period or interval of zero
    ZeroPeriod,
    /// GPIO number does not exist
    InvalidPin(u8),
    /// Same GPIO assigned twice
    PinConflict(u8),
    /// Rangefinder pins other than [`I2C_SDA_PIN`]/[`I2C_SCL_PIN`]
    I2cPinsFixed,
    /// Motion threshold not a positive finite speed
    InvalidThreshold,
}

/// One two-wire seven-segment display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DisplayConfig {
    /// Clock line GPIO
    pub clock_pin: u8,
    /// Data line GPIO
    pub data_pin: u8,
    /// Minimum hold time per clock edge (µs)
    pub bit_delay_us: u32,
    /// Brightness level 0-7
    pub brightness: u8,
    /// Re-send the brightness command with every frame
    pub refresh_brightness: bool,
}

impl DisplayConfig {
    /// Timer display defaults (fast controller, 3 µs hold)
    pub const TIMER: Self = Self {
        clock_pin: 19,
        data_pin: 18,
        bit_delay_us: 3,
        brightness: MAX_BRIGHTNESS,
        refresh_brightness: false,
    };

    /// Lap display defaults (slow controller, 50 µs hold)
    pub const LAP: Self = Self {
        clock_pin: 21,
        data_pin: 20,
        bit_delay_us: 50,
        brightness: MAX_BRIGHTNESS,
        refresh_brightness: false,
    };

    fn validate(&self) -> Result<(), ConfigError> {
        if self.brightness > MAX_BRIGHTNESS {
            return Err(ConfigError::BrightnessOutOfRange);
        }
        if self.bit_delay_us == 0 {
            return Err(ConfigError::ZeroBitDelay);
        }
        Ok(())
    }
}

/// Beam-break gate input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BeamConfig {
    /// Input GPIO
    pub pin: u8,
    /// Enable the internal pull-up (sensor idles high)
    pub pull_up: bool,
    /// Debounce window (µs)
    pub debounce_us: u32,
}

impl Default for BeamConfig {
    fn default() -> Self {
        Self {
            pin: 4,
            pull_up: true,
            debounce_us: DEFAULT_DEBOUNCE_US,
        }
    }
}

/// I2C rangefinder
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RangingConfig {
    /// 7-bit device address
    pub address: u8,
    /// Distance register selector
    pub register: u8,
    /// I2C data GPIO, must be [`I2C_SDA_PIN`]
    pub sda_pin: u8,
    /// I2C clock GPIO, must be [`I2C_SCL_PIN`]
    pub scl_pin: u8,
    /// Bus frequency (Hz)
    pub frequency_hz: u32,
    /// Minimum interval between samples (µs)
    pub sample_period_us: u32,
    /// Wait between register select and read (µs)
    pub conversion_us: u32,
    /// Speeds above this count as motion (m/s)
    pub motion_threshold_mps: f32,
}

impl Default for RangingConfig {
    fn default() -> Self {
        Self {
            address: 0x35,
            register: 0x05,
            sda_pin: I2C_SDA_PIN,
            scl_pin: I2C_SCL_PIN,
            frequency_hz: 100_000,
            sample_period_us: DEFAULT_SAMPLE_PERIOD_US,
            conversion_us: DEFAULT_CONVERSION_US,
            motion_threshold_mps: DEFAULT_MOTION_THRESHOLD_MPS,
        }
    }
}

/// Complete rig configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RigConfig {
    /// Rig name, shown in the boot log
    pub name: String<MAX_NAME_LEN>,
    /// Race step interval (ms)
    pub poll_interval_ms: u32,
    /// Mode button GPIO
    pub button_pin: u8,
    /// Lap completion behaviour
    pub lap_policy: LapPolicy,
    /// Running-time display
    pub timer_display: DisplayConfig,
    /// Last-lap display
    pub lap_display: DisplayConfig,
    /// Beam gate
    pub beam: BeamConfig,
    /// Rangefinder
    pub ranging: RangingConfig,
}

impl Default for RigConfig {
    fn default() -> Self {
        let mut name = String::new();
        // Fits MAX_NAME_LEN
        let _ = name.push_str("lapgate");

        Self {
            name,
            poll_interval_ms: 10,
            button_pin: 15,
            lap_policy: LapPolicy::RestartOnLap,
            timer_display: DisplayConfig::TIMER,
            lap_display: DisplayConfig::LAP,
            beam: BeamConfig::default(),
            ranging: RangingConfig::default(),
        }
    }
}

impl RigConfig {
    /// Check ranges and pin assignments
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.timer_display.validate()?;
        self.lap_display.validate()?;

        if self.poll_interval_ms == 0
            || self.beam.debounce_us == 0
            || self.ranging.sample_period_us == 0
            || self.ranging.frequency_hz == 0
        {
            return Err(ConfigError::ZeroPeriod);
        }

        let threshold = self.ranging.motion_threshold_mps;
        if !threshold.is_finite() || threshold <= 0.0 {
            return Err(ConfigError::InvalidThreshold);
        }

        if self.ranging.sda_pin != I2C_SDA_PIN || self.ranging.scl_pin != I2C_SCL_PIN {
            return Err(ConfigError::I2cPinsFixed);
        }

        let mut used: FnvIndexSet<u8, 16> = FnvIndexSet::new();
        for pin in self.pins() {
            if pin > MAX_GPIO {
                return Err(ConfigError::InvalidPin(pin));
            }
            if used.insert(pin) != Ok(true) {
                return Err(ConfigError::PinConflict(pin));
            }
        }

        Ok(())
    }

    /// Every GPIO the rig claims
    pub fn pins(&self) -> [u8; 8] {
        [
            self.timer_display.clock_pin,
            self.timer_display.data_pin,
            self.lap_display.clock_pin,
            self.lap_display.data_pin,
            self.beam.pin,
            self.ranging.sda_pin,
            self.ranging.scl_pin,
            self.button_pin,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = RigConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.name.as_str(), "lapgate");
        assert_eq!(config.timer_display.bit_delay_us, 3);
        assert_eq!(config.lap_display.bit_delay_us, 50);
        assert_eq!(config.ranging.address, 0x35);
    }

    #[test]
    fn test_pin_conflict() {
        let mut config = RigConfig::default();
        config.lap_display.data_pin = config.beam.pin;
        assert_eq!(config.validate(), Err(ConfigError::PinConflict(4)));
    }

    #[test]
    fn test_i2c_pins_cannot_move() {
        // Moving SDA would leave GPIO 16 claimable by the beam
        let mut config = RigConfig::default();
        config.ranging.sda_pin = 2;
        config.beam.pin = 16;
        assert_eq!(config.validate(), Err(ConfigError::I2cPinsFixed));

        let mut config = RigConfig::default();
        config.ranging.scl_pin = 3;
        assert_eq!(config.validate(), Err(ConfigError::I2cPinsFixed));
    }

    #[test]
    fn test_i2c_pins_still_conflict() {
        let mut config = RigConfig::default();
        config.button_pin = I2C_SCL_PIN;
        assert_eq!(config.validate(), Err(ConfigError::PinConflict(I2C_SCL_PIN)));
    }

    #[test]
    fn test_motion_threshold_must_be_positive() {
        for bad in [-1.0, 0.0, f32::NAN, f32::INFINITY] {
            let mut config = RigConfig::default();
            config.ranging.motion_threshold_mps = bad;
            assert_eq!(config.validate(), Err(ConfigError::InvalidThreshold));
        }

        let mut config = RigConfig::default();
        config.ranging.motion_threshold_mps = 0.01;
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_invalid_pin() {
        let mut config = RigConfig::default();
        config.button_pin = 30;
        assert_eq!(config.validate(), Err(ConfigError::InvalidPin(30)));
    }

    #[test]
    fn test_brightness_range() {
        let mut config = RigConfig::default();
        config.timer_display.brightness = 8;
        assert_eq!(config.validate(), Err(ConfigError::BrightnessOutOfRange));
    }

    #[test]
    fn test_zero_bit_delay() {
        let mut config = RigConfig::default();
        config.lap_display.bit_delay_us = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroBitDelay));
    }

    #[test]
    fn test_zero_period() {
        let mut config = RigConfig::default();
        config.poll_interval_ms = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroPeriod));
    }
}
