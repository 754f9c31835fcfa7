//! Monotonic clock trait

use crate::time::Instant;

/// Free-running microsecond clock
///
/// Implementations return the full 64-bit microsecond uptime; truncating
/// it would fold long gaps between steps back onto short ones.
pub trait Clock {
    /// Current time
    fn now(&self) -> Instant;
}
