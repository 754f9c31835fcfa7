//! Sensor drivers

pub mod beam;
pub mod rangefinder;

pub use beam::BeamInput;
pub use rangefinder::Rangefinder;
