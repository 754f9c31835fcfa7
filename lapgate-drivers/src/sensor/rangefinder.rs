//! I2C ultrasonic rangefinder
//!
//! The sensor starts a measurement when its distance register is
//! selected and needs roughly 100 ms before the two-byte result can be
//! read back. Distance is big-endian millimetres; `0xFFFF` means no echo.

use lapgate_core::config::RangingConfig;
use lapgate_core::traits::{RangeSensor, SensorError};
use lapgate_hal::I2cBus;

/// Default 7-bit device address
pub const DEFAULT_ADDRESS: u8 = 0x35;

/// Default distance register
pub const DISTANCE_REGISTER: u8 = 0x05;

/// Reading reported when nothing reflected the pulse
pub const NO_ECHO: u16 = 0xFFFF;

/// Register-addressed ultrasonic rangefinder
pub struct Rangefinder<I> {
    bus: I,
    address: u8,
    register: u8,
}

impl<I: I2cBus> Rangefinder<I> {
    /// Create a driver for a device at `address`
    pub fn new(bus: I, address: u8, register: u8) -> Self {
        Self {
            bus,
            address,
            register,
        }
    }

    /// Create a driver from the rig configuration
    pub fn from_config(bus: I, config: &RangingConfig) -> Self {
        Self::new(bus, config.address, config.register)
    }

    /// Device address
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Give the bus back
    pub fn release(self) -> I {
        self.bus
    }
}

impl<I> RangeSensor for Rangefinder<I>
where
    I: I2cBus,
    I::Error: Into<SensorError>,
{
    fn trigger(&mut self) -> Result<(), SensorError> {
        self.bus
            .write(self.address, &[self.register])
            .map_err(Into::into)
    }

    fn fetch_mm(&mut self) -> Result<u16, SensorError> {
        let mut buf = [0u8; 2];
        self.bus
            .read(self.address, &mut buf)
            .map_err(Into::into)?;

        match u16::from_be_bytes(buf) {
            NO_ECHO => Err(SensorError::OutOfRange),
            mm => Ok(mm),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use heapless::Vec;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum MockError {
        NoAck,
        Arbitration,
    }

    impl From<MockError> for SensorError {
        fn from(e: MockError) -> Self {
            match e {
                MockError::NoAck => SensorError::Nack,
                MockError::Arbitration => SensorError::Bus,
            }
        }
    }

    /// Mock bus with a canned response and a write log
    struct MockBus {
        response: [u8; 2],
        fail: Option<MockError>,
        writes: Vec<(u8, u8), 8>,
        reads: Vec<u8, 8>,
    }

    impl MockBus {
        fn new(response: [u8; 2]) -> Self {
            Self {
                response,
                fail: None,
                writes: Vec::new(),
                reads: Vec::new(),
            }
        }
    }

    impl I2cBus for MockBus {
        type Error = MockError;

        fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error> {
            if let Some(e) = self.fail {
                return Err(e);
            }
            for byte in data {
                self.writes.push((address, *byte)).unwrap();
            }
            Ok(())
        }

        fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
            if let Some(e) = self.fail {
                return Err(e);
            }
            self.reads.push(address).unwrap();
            buf.copy_from_slice(&self.response[..buf.len()]);
            Ok(())
        }
    }

    #[test]
    fn test_trigger_selects_register() {
        let mut ranger = Rangefinder::new(MockBus::new([0, 0]), DEFAULT_ADDRESS, DISTANCE_REGISTER);
        ranger.trigger().unwrap();

        let bus = ranger.release();
        assert_eq!(bus.writes.as_slice(), &[(0x35, 0x05)]);
        assert!(bus.reads.is_empty());
    }

    #[test]
    fn test_fetch_is_big_endian() {
        let mut ranger = Rangefinder::new(MockBus::new([0x03, 0xE8]), DEFAULT_ADDRESS, DISTANCE_REGISTER);
        assert_eq!(ranger.fetch_mm(), Ok(1000));
        assert_eq!(ranger.release().reads.as_slice(), &[0x35]);
    }

    #[test]
    fn test_no_echo_is_out_of_range() {
        let mut ranger = Rangefinder::new(MockBus::new([0xFF, 0xFF]), DEFAULT_ADDRESS, DISTANCE_REGISTER);
        assert_eq!(ranger.fetch_mm(), Err(SensorError::OutOfRange));
    }

    #[test]
    fn test_bus_errors_map_to_sensor_errors() {
        let mut bus = MockBus::new([0, 0]);
        bus.fail = Some(MockError::NoAck);
        let mut ranger = Rangefinder::new(bus, DEFAULT_ADDRESS, DISTANCE_REGISTER);
        assert_eq!(ranger.trigger(), Err(SensorError::Nack));

        let mut bus = ranger.release();
        bus.fail = Some(MockError::Arbitration);
        let mut ranger = Rangefinder::new(bus, DEFAULT_ADDRESS, DISTANCE_REGISTER);
        assert_eq!(ranger.fetch_mm(), Err(SensorError::Bus));
    }

    #[test]
    fn test_from_config() {
        let config = RangingConfig {
            address: 0x29,
            ..Default::default()
        };
        let ranger = Rangefinder::from_config(MockBus::new([0, 0]), &config);
        assert_eq!(ranger.address(), 0x29);
    }
}
