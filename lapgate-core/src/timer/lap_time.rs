//! Minutes:seconds lap time

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Largest minute value before wrapping back to zero
pub const MAX_MINUTES: u8 = 99;

/// Largest second value before cascading into minutes
pub const MAX_SECONDS: u8 = 59;

/// A lap or elapsed time in `MM:SS`
///
/// Seconds are always in 0-59 and minutes in 0-99; incrementing past
/// 99:59 wraps to 00:00 because the displays only have four digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LapTime {
    minutes: u8,
    seconds: u8,
}

impl LapTime {
    /// 00:00
    pub const ZERO: Self = Self {
        minutes: 0,
        seconds: 0,
    };

    /// Create a lap time, clamping seconds to 59 and wrapping minutes past 99
    pub const fn new(minutes: u8, seconds: u8) -> Self {
        let seconds = if seconds > MAX_SECONDS {
            MAX_SECONDS
        } else {
            seconds
        };
        Self {
            minutes: minutes % (MAX_MINUTES + 1),
            seconds,
        }
    }

    /// Minutes part (0-99)
    pub const fn minutes(&self) -> u8 {
        self.minutes
    }

    /// Seconds part (0-59)
    pub const fn seconds(&self) -> u8 {
        self.seconds
    }

    /// Total seconds represented
    pub const fn total_seconds(&self) -> u32 {
        self.minutes as u32 * 60 + self.seconds as u32
    }

    /// Advance by one second, cascading into minutes and wrapping after 99:59
    pub fn increment(&mut self) {
        if self.seconds < MAX_SECONDS {
            self.seconds += 1;
            return;
        }

        self.seconds = 0;
        self.minutes = if self.minutes < MAX_MINUTES {
            self.minutes + 1
        } else {
            0
        };
    }

    /// The four display digits `[M, M, S, S]`
    pub const fn digits(&self) -> [u8; 4] {
        [
            self.minutes / 10,
            self.minutes % 10,
            self.seconds / 10,
            self.seconds % 10,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_increment_within_minute() {
        let mut t = LapTime::new(1, 22);
        t.increment();
        assert_eq!(t, LapTime::new(1, 23));
    }

    #[test]
    fn test_seconds_cascade_into_minutes() {
        let mut t = LapTime::new(4, 59);
        t.increment();
        assert_eq!(t.minutes(), 5);
        assert_eq!(t.seconds(), 0);
    }

    #[test]
    fn test_wraps_after_99_59() {
        let mut t = LapTime::new(99, 59);
        t.increment();
        assert_eq!(t, LapTime::ZERO);
    }

    #[test]
    fn test_new_keeps_fields_in_range() {
        let t = LapTime::new(100, 75);
        assert_eq!(t.minutes(), 0);
        assert_eq!(t.seconds(), 59);
    }

    #[test]
    fn test_digits() {
        assert_eq!(LapTime::new(1, 23).digits(), [0, 1, 2, 3]);
        assert_eq!(LapTime::new(45, 9).digits(), [4, 5, 0, 9]);
        assert_eq!(LapTime::new(12, 34).total_seconds(), 754);
    }
}
