//! Beam-break and rangefinder traits

/// Errors that can occur reading a sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// Bus transfer failed
    Bus,
    /// Device did not acknowledge its address
    Nack,
    /// Reading outside the sensor's physical range
    OutOfRange,
}

/// Beam-break gate input
pub trait BeamSensor {
    /// Prepare the input (direction, pull-up)
    fn init(&mut self) {}

    /// Raw level: `true` while the beam is unobstructed
    fn is_clear(&mut self) -> bool;
}

/// Register-addressed distance sensor
///
/// A measurement is a trigger followed, some time later, by a fetch.
pub trait RangeSensor {
    /// Select the distance register to start a measurement
    fn trigger(&mut self) -> Result<(), SensorError>;

    /// Read the distance in millimetres
    fn fetch_mm(&mut self) -> Result<u16, SensorError>;
}
