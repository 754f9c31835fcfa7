//! Hardware abstraction traits
//!
//! These traits define the interface between the timing logic and
//! hardware-specific implementations.

pub mod clock;
pub mod display;
pub mod sensor;

pub use clock::Clock;
pub use display::SegmentDisplay;
pub use sensor::{BeamSensor, RangeSensor, SensorError};
