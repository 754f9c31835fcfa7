//! RP2040 glue for the HAL traits
//!
//! Config-driven GPIO allocation plus thin wrappers that implement the
//! lapgate-hal and lapgate-core traits for embassy-rp peripherals.

use embassy_rp::gpio::{AnyPin, Flex, Input, Output};
use embassy_rp::i2c::{self, Blocking, I2c};
use embassy_rp::peripherals::I2C0;
use embassy_rp::Peri;

use lapgate_core::time::Instant;
use lapgate_core::traits::{Clock, SensorError};
use lapgate_hal::{FlexPin, I2cBus, InputPin, OutputPin};

/// Number of user GPIOs on the RP2040
pub const GPIO_COUNT: usize = 30;

/// Error when requesting a pin
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinError {
    /// Pin number out of range (0-29 valid)
    InvalidPin(u8),
    /// Pin already taken
    AlreadyTaken(u8),
}

/// Holds the free GPIOs so they can be taken by the numbers in `rig.toml`
pub struct PinBank {
    pins: [Option<Peri<'static, AnyPin>>; GPIO_COUNT],
}

impl PinBank {
    /// Create a bank; `None` entries are pins already claimed elsewhere
    pub fn new(pins: [Option<Peri<'static, AnyPin>>; GPIO_COUNT]) -> Self {
        Self { pins }
    }

    /// Take a pin by number
    pub fn take(&mut self, pin_num: u8) -> Result<Peri<'static, AnyPin>, PinError> {
        self.pins
            .get_mut(pin_num as usize)
            .ok_or(PinError::InvalidPin(pin_num))?
            .take()
            .ok_or(PinError::AlreadyTaken(pin_num))
    }
}

/// Push-pull output
pub struct PushPull(pub Output<'static>);

impl OutputPin for PushPull {
    fn set_high(&mut self) {
        self.0.set_high();
    }

    fn set_low(&mut self) {
        self.0.set_low();
    }

    fn is_set_high(&self) -> bool {
        self.0.is_set_high()
    }
}

/// Bidirectional line
pub struct FlexLine(pub Flex<'static>);

impl OutputPin for FlexLine {
    fn set_high(&mut self) {
        self.0.set_high();
    }

    fn set_low(&mut self) {
        self.0.set_low();
    }

    fn is_set_high(&self) -> bool {
        self.0.is_set_high()
    }
}

impl InputPin for FlexLine {
    fn is_high(&self) -> bool {
        self.0.is_high()
    }
}

impl FlexPin for FlexLine {
    fn set_as_input(&mut self) {
        self.0.set_as_input();
    }

    fn set_as_output(&mut self) {
        self.0.set_as_output();
    }
}

/// Digital input
pub struct Level(pub Input<'static>);

impl InputPin for Level {
    fn is_high(&self) -> bool {
        self.0.is_high()
    }
}

/// Blocking I2C0 master
pub struct Bus(pub I2c<'static, I2C0, Blocking>);

impl I2cBus for Bus {
    type Error = SensorError;

    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error> {
        self.0.blocking_write(address, data).map_err(sensor_error)
    }

    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
        self.0.blocking_read(address, buf).map_err(sensor_error)
    }
}

fn sensor_error(e: i2c::Error) -> SensorError {
    match e {
        i2c::Error::Abort(i2c::AbortReason::NoAcknowledge) => SensorError::Nack,
        _ => SensorError::Bus,
    }
}

/// Embassy uptime as a lapgate instant
pub struct UptimeClock;

impl Clock for UptimeClock {
    fn now(&self) -> Instant {
        Instant::from_micros(embassy_time::Instant::now().as_micros())
    }
}
