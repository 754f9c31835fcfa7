//! Four-digit display frames
//!
//! A [`DigitFrame`] is what one render sends to one display: four digits
//! and whether the colon between the second and third digit is lit.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::segment::{encode, COLON_BIT};
use crate::timer::LapTime;

/// Number of digit positions on each display
pub const DIGIT_COUNT: usize = 4;

/// Four decimal digits plus a colon flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DigitFrame {
    digits: [u8; DIGIT_COUNT],
    colon: bool,
}

impl DigitFrame {
    /// `00:00`, shown while waiting for the first car
    pub const ZERO_TIME: Self = Self {
        digits: [0; DIGIT_COUNT],
        colon: true,
    };

    /// Build a frame; each digit is reduced into 0-9
    pub const fn new(digits: [u8; DIGIT_COUNT], colon: bool) -> Self {
        Self {
            digits: [
                digits[0] % 10,
                digits[1] % 10,
                digits[2] % 10,
                digits[3] % 10,
            ],
            colon,
        }
    }

    /// `MM:SS` frame for a lap time
    pub const fn from_lap_time(time: LapTime) -> Self {
        Self::new(time.digits(), true)
    }

    /// The four digits, most significant first
    pub const fn digits(&self) -> [u8; DIGIT_COUNT] {
        self.digits
    }

    /// Whether the colon is lit
    pub const fn colon(&self) -> bool {
        self.colon
    }

    /// Segment bytes in display order, colon merged into the second digit
    pub fn segments(&self) -> [u8; DIGIT_COUNT] {
        let mut segments = self.digits.map(encode);
        if self.colon {
            segments[1] |= COLON_BIT;
        }
        segments
    }
}

impl From<LapTime> for DigitFrame {
    fn from(time: LapTime) -> Self {
        Self::from_lap_time(time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lap_time_frame() {
        let frame = DigitFrame::from(LapTime::new(1, 23));
        assert_eq!(frame.digits(), [0, 1, 2, 3]);
        assert!(frame.colon());
    }

    #[test]
    fn test_colon_goes_into_second_digit() {
        let frame = DigitFrame::new([1, 2, 3, 4], true);
        assert_eq!(frame.segments(), [0x06, 0x5b | 0x80, 0x4f, 0x66]);

        let frame = DigitFrame::new([1, 2, 3, 4], false);
        assert_eq!(frame.segments(), [0x06, 0x5b, 0x4f, 0x66]);
    }

    #[test]
    fn test_zero_time_frame() {
        assert_eq!(DigitFrame::ZERO_TIME.segments(), [0x3f, 0xbf, 0x3f, 0x3f]);
        assert_eq!(DigitFrame::ZERO_TIME, DigitFrame::from(LapTime::ZERO));
    }

    #[test]
    fn test_digits_reduced_into_range() {
        let frame = DigitFrame::new([10, 11, 19, 9], false);
        assert_eq!(frame.digits(), [0, 1, 9, 9]);
    }
}
