//! Debounced edge detection for the beam-break input
//!
//! The raw level must sit at a new value, without flickering, for the
//! whole debounce window before the debounced level follows it. Every
//! raw change restarts the window, so contact bounce or a reflection
//! flicker never reaches the lap timer.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::time::Instant;

/// Default debounce window in microseconds (50 ms)
pub const DEFAULT_DEBOUNCE_US: u32 = 50_000;

/// A committed change of the debounced level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Edge {
    /// Low to high: beam restored
    Rising,
    /// High to low: beam broken
    Falling,
}

impl Edge {
    /// Check if this edge is a beam break (idle-high input)
    pub fn is_break(&self) -> bool {
        matches!(self, Edge::Falling)
    }
}

/// Debounced edge detector
#[derive(Debug, Clone)]
pub struct EdgeDetector {
    window_us: u32,
    /// Level reported to consumers
    debounced: bool,
    /// Level seen on the previous poll
    last_raw: bool,
    /// When the raw level last changed
    last_change: Instant,
    primed: bool,
}

impl Default for EdgeDetector {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE_US)
    }
}

impl EdgeDetector {
    /// Create a detector with the given window
    ///
    /// The detector adopts the first level it is polled with as its stable
    /// level, so a beam that is already blocked at start-up is not a break.
    pub const fn new(window_us: u32) -> Self {
        Self {
            window_us,
            debounced: true,
            last_raw: true,
            last_change: Instant::ZERO,
            primed: false,
        }
    }

    /// Seed the stable level without producing an edge
    pub fn prime(&mut self, level: bool, now: Instant) {
        self.debounced = level;
        self.last_raw = level;
        self.last_change = now;
        self.primed = true;
    }

    /// Feed one raw sample; returns an edge when the debounced level flips
    pub fn update(&mut self, raw: bool, now: Instant) -> Option<Edge> {
        if !self.primed {
            self.prime(raw, now);
            return None;
        }

        if raw != self.last_raw {
            self.last_raw = raw;
            self.last_change = now;
        }

        if raw == self.debounced || !now.has_elapsed(self.last_change, self.window_us) {
            return None;
        }

        self.debounced = raw;
        Some(if raw { Edge::Rising } else { Edge::Falling })
    }

    /// Current debounced level
    pub fn level(&self) -> bool {
        self.debounced
    }

    /// Check if a raw change is waiting out the window
    pub fn is_pending(&self) -> bool {
        self.primed && self.last_raw != self.debounced
    }
}
