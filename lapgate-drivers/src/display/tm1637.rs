//! TM1637 four-digit display controller
//!
//! The TM1637 talks a two-wire protocol that looks like I2C but is not:
//! no device address, bytes go out LSB first, and the controller pulls
//! the data line low during a ninth clock to acknowledge each byte.
//!
//! # Protocol
//!
//! - Start: data falls while clock is high
//! - Stop: data rises while clock is high
//! - Bit: data changes while clock is low, sampled on the rising clock
//! - Ack: data released for one clock after every byte
//!
//! A frame is three transactions: data command (auto-increment), address
//! command followed by the four segment bytes, and optionally the display
//! control command carrying the brightness.
//!
//! Every step is a busy-wait of the configured bit-hold delay, so one
//! frame costs a few hundred microseconds at the 3 µs default and a few
//! milliseconds at 50 µs. The ack is never checked.

use embedded_hal::delay::DelayNs;
use lapgate_core::config::DisplayConfig;
use lapgate_core::frame::{DigitFrame, DIGIT_COUNT};
use lapgate_core::traits::display::MAX_BRIGHTNESS;
use lapgate_core::traits::SegmentDisplay;
use lapgate_hal::{FlexPin, OutputPin};

/// Command bytes
pub mod cmd {
    /// Data command: write, auto-increment address
    pub const DATA_AUTO_INCREMENT: u8 = 0x40;
    /// Address command: start at digit 0
    pub const ADDRESS_ZERO: u8 = 0xC0;
    /// Display control: on, brightness in the low three bits
    pub const DISPLAY_ON: u8 = 0x88;
}

/// Hold time around the acknowledge clock (µs)
pub const ACK_HOLD_US: u32 = 5;

/// Driver settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Tm1637Config {
    /// Hold time per clock edge (µs)
    pub bit_delay_us: u32,
    /// Brightness 0-7
    pub brightness: u8,
    /// Send the display control command after every frame
    pub refresh_brightness: bool,
}

impl Default for Tm1637Config {
    fn default() -> Self {
        Self {
            bit_delay_us: 3,
            brightness: MAX_BRIGHTNESS,
            refresh_brightness: false,
        }
    }
}

impl From<&DisplayConfig> for Tm1637Config {
    fn from(config: &DisplayConfig) -> Self {
        Self {
            bit_delay_us: config.bit_delay_us,
            brightness: config.brightness,
            refresh_brightness: config.refresh_brightness,
        }
    }
}

/// TM1637 driver over a clock pin and a bidirectional data pin
pub struct Tm1637<CLK, DIO, D> {
    clk: CLK,
    dio: DIO,
    delay: D,
    config: Tm1637Config,
}

impl<CLK, DIO, D> Tm1637<CLK, DIO, D>
where
    CLK: OutputPin,
    DIO: FlexPin,
    D: DelayNs,
{
    /// Create a driver; the lines are not touched until [`init`](SegmentDisplay::init)
    pub fn new(clk: CLK, dio: DIO, delay: D, config: Tm1637Config) -> Self {
        Self {
            clk,
            dio,
            delay,
            config: Tm1637Config {
                brightness: config.brightness.min(MAX_BRIGHTNESS),
                ..config
            },
        }
    }

    fn hold(&mut self) {
        self.delay.delay_us(self.config.bit_delay_us);
    }

    fn start(&mut self) {
        self.clk.set_high();
        self.dio.set_high();
        self.hold();
        self.dio.set_low();
        self.hold();
        self.clk.set_low();
    }

    fn stop(&mut self) {
        self.clk.set_low();
        self.hold();
        self.dio.set_low();
        self.hold();
        self.clk.set_high();
        self.hold();
        self.dio.set_high();
    }

    fn write_byte(&mut self, byte: u8) {
        for bit in 0..8 {
            self.clk.set_low();
            self.dio.set_state(byte & (1 << bit) != 0);
            self.hold();
            self.clk.set_high();
            self.hold();
        }

        // Ack slot: let the controller pull data low, result ignored
        self.clk.set_low();
        self.dio.set_as_input();
        self.delay.delay_us(ACK_HOLD_US);
        self.clk.set_high();
        self.delay.delay_us(ACK_HOLD_US);
        self.dio.set_as_output();
        self.clk.set_low();
    }

    fn command(&mut self, byte: u8) {
        self.start();
        self.write_byte(byte);
        self.stop();
    }

    fn display_control(&mut self) {
        self.command(cmd::DISPLAY_ON | self.config.brightness);
    }

    /// Send raw segment bytes for all four digits
    pub fn write_segments(&mut self, segments: [u8; DIGIT_COUNT]) {
        self.command(cmd::DATA_AUTO_INCREMENT);

        self.start();
        self.write_byte(cmd::ADDRESS_ZERO);
        for byte in segments {
            self.write_byte(byte);
        }
        self.stop();

        if self.config.refresh_brightness {
            self.display_control();
        }
    }
}

impl<CLK, DIO, D> SegmentDisplay for Tm1637<CLK, DIO, D>
where
    CLK: OutputPin,
    DIO: FlexPin,
    D: DelayNs,
{
    fn init(&mut self) {
        self.dio.set_as_output();
        self.dio.set_high();
        self.clk.set_high();
        self.display_control();
    }

    fn show(&mut self, frame: &DigitFrame) {
        self.write_segments(frame.segments());
    }

    fn set_brightness(&mut self, brightness: u8) {
        self.config.brightness = brightness.min(MAX_BRIGHTNESS);
        self.display_control();
    }
}
