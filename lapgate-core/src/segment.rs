//! Seven-segment digit codec
//!
//! Segment bit layout (bit 0 = segment A ... bit 6 = segment G):
//!
//! ```text
//!    --A--
//!   F     B
//!    --G--
//!   E     C
//!    --D--   (bit 7 = colon / decimal point)
//! ```

/// Segment patterns for the decimal digits 0-9
pub const DIGIT_SEGMENTS: [u8; 10] = [
    0x3f, // 0
    0x06, // 1
    0x5b, // 2
    0x4f, // 3
    0x66, // 4
    0x6d, // 5
    0x7d, // 6
    0x07, // 7
    0x7f, // 8
    0x6f, // 9
];

/// Colon bit, OR'd into the second digit of a four-digit display
pub const COLON_BIT: u8 = 0x80;

/// Encode a decimal digit into its segment pattern
///
/// Callers keep digits in 0-9 by construction; anything larger is
/// reduced modulo 10 instead of indexing out of bounds.
pub const fn encode(digit: u8) -> u8 {
    DIGIT_SEGMENTS[(digit % 10) as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_patterns() {
        assert_eq!(encode(0), 0x3f);
        assert_eq!(encode(1), 0x06);
        assert_eq!(encode(8), 0x7f);
        assert_eq!(encode(9), 0x6f);
    }

    #[test]
    fn test_patterns_are_distinct_and_seven_bit() {
        for a in 0..10u8 {
            assert_eq!(encode(a) & COLON_BIT, 0);
            for b in (a + 1)..10u8 {
                assert_ne!(encode(a), encode(b), "digits {} and {} collide", a, b);
            }
        }
    }

    #[test]
    fn test_out_of_range_is_clamped() {
        assert_eq!(encode(10), encode(0));
        assert_eq!(encode(13), encode(3));
    }
}
