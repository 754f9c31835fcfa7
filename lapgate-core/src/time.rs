//! Monotonic microsecond timestamps
//!
//! Timestamps are 64-bit microsecond counters, so a rig can sit idle for
//! hours between steps without the interval folding back on itself. Only
//! differences between two timestamps are meaningful, and differences are
//! taken with wrapping arithmetic so a counter seeded near the top of its
//! range still yields the right interval.

/// Microseconds in one second
pub const MICROS_PER_SECOND: u32 = 1_000_000;

/// Microseconds in one millisecond
pub const MICROS_PER_MILLI: u32 = 1_000;

/// A point on the monotonic microsecond clock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Instant(u64);

impl Instant {
    /// Clock origin
    pub const ZERO: Self = Self(0);

    /// Create an instant from a raw microsecond counter value
    pub const fn from_micros(micros: u64) -> Self {
        Self(micros)
    }

    /// Create an instant from milliseconds since the clock origin
    pub const fn from_millis(millis: u64) -> Self {
        Self(millis.wrapping_mul(MICROS_PER_MILLI as u64))
    }

    /// Raw counter value
    pub const fn as_micros(self) -> u64 {
        self.0
    }

    /// Microseconds elapsed from `earlier` to `self`
    pub const fn micros_since(self, earlier: Instant) -> u64 {
        self.0.wrapping_sub(earlier.0)
    }

    /// This instant shifted forward by `micros`
    pub const fn add_micros(self, micros: u32) -> Self {
        Self(self.0.wrapping_add(micros as u64))
    }

    /// Whether at least `micros` have passed since `earlier`
    pub const fn has_elapsed(self, earlier: Instant, micros: u32) -> bool {
        self.micros_since(earlier) >= micros as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_micros_since() {
        let a = Instant::from_micros(1_000);
        let b = Instant::from_micros(251_000);
        assert_eq!(b.micros_since(a), 250_000);
    }

    #[test]
    fn test_difference_across_wraparound() {
        let before = Instant::from_micros(u64::MAX - 99);
        let after = before.add_micros(300);
        assert_eq!(after.as_micros(), 200);
        assert_eq!(after.micros_since(before), 300);
        assert!(after.has_elapsed(before, 300));
        assert!(!after.has_elapsed(before, 301));
    }

    #[test]
    fn test_interval_longer_than_u32_micros() {
        // 72 minutes does not fit in a 32-bit microsecond count
        let start = Instant::from_millis(9_000);
        let later = Instant::from_millis(9_000 + 72 * 60_000);
        assert_eq!(later.micros_since(start), 4_320_000_000);
        assert!(later.has_elapsed(start, u32::MAX));
    }

    #[test]
    fn test_from_millis() {
        assert_eq!(Instant::from_millis(400).as_micros(), 400_000);
    }
}
