//! Beam-break gate input
//!
//! The infrared receiver drives its output high while it sees the
//! emitter and low while something blocks the beam. Receivers with the
//! opposite sense are handled by inverting the pin.

use lapgate_core::traits::BeamSensor;
use lapgate_hal::InputPin;

/// Beam gate on a digital input
pub struct BeamInput<P> {
    pin: P,
    /// If true, beam clear = pin LOW
    inverted: bool,
}

impl<P: InputPin> BeamInput<P> {
    /// Create a beam input
    ///
    /// # Arguments
    /// - `pin`: The input pin, with its pull already configured
    /// - `inverted`: If true, the beam is clear when the pin is LOW
    pub fn new(pin: P, inverted: bool) -> Self {
        Self { pin, inverted }
    }

    /// Receiver that idles high (the usual wiring)
    pub fn idle_high(pin: P) -> Self {
        Self::new(pin, false)
    }
}

impl<P: InputPin> BeamSensor for BeamInput<P> {
    fn is_clear(&mut self) -> bool {
        self.pin.is_high() != self.inverted
    }
}
