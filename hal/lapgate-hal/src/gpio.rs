//! GPIO pin abstractions
//!
//! Provides traits for digital input and output pins. Writes are
//! infallible: bit-banged protocols on this rig have no way to report a
//! failed pin toggle, so implementations must not fail either.

/// Digital output pin
pub trait OutputPin {
    /// Set the pin high (logic 1)
    fn set_high(&mut self);

    /// Set the pin low (logic 0)
    fn set_low(&mut self);

    /// Set the pin to a specific state
    fn set_state(&mut self, high: bool) {
        if high {
            self.set_high();
        } else {
            self.set_low();
        }
    }

    /// Check if the pin is currently driven high
    fn is_set_high(&self) -> bool;

    /// Check if the pin is currently driven low
    fn is_set_low(&self) -> bool {
        !self.is_set_high()
    }
}

/// Digital input pin
pub trait InputPin {
    /// Check if the pin reads high (logic 1)
    fn is_high(&self) -> bool;

    /// Check if the pin reads low (logic 0)
    fn is_low(&self) -> bool {
        !self.is_high()
    }
}

/// Pin whose direction can be switched at runtime
///
/// Two-wire display controllers need the data line released to input
/// for the acknowledge slot after every byte, then driven again.
pub trait FlexPin: OutputPin + InputPin {
    /// Release the line (high impedance, readable)
    fn set_as_input(&mut self);

    /// Drive the line again with the last written level
    fn set_as_output(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockPin {
        high: bool,
    }

    impl OutputPin for MockPin {
        fn set_high(&mut self) {
            self.high = true;
        }

        fn set_low(&mut self) {
            self.high = false;
        }

        fn is_set_high(&self) -> bool {
            self.high
        }
    }

    #[test]
    fn test_set_state_dispatches() {
        let mut pin = MockPin { high: false };

        pin.set_state(true);
        assert!(pin.is_set_high());

        pin.set_state(false);
        assert!(pin.is_set_low());
    }
}
