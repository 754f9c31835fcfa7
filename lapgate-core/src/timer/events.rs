//! Events emitted by the lap timer

use super::lap_time::LapTime;

/// Outcome of feeding a beam break into the lap timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerEvent {
    /// Timer was idle and started a new lap from 00:00
    Started,
    /// A running lap finished
    LapCompleted {
        /// Time of the lap that just finished
        lap: LapTime,
        /// Laps completed since the last reset, including this one
        count: u32,
    },
}

impl TimerEvent {
    /// Check if this event finished a lap
    pub fn is_lap(&self) -> bool {
        matches!(self, TimerEvent::LapCompleted { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_lap() {
        assert!(!TimerEvent::Started.is_lap());
        assert!(TimerEvent::LapCompleted {
            lap: LapTime::new(0, 42),
            count: 1,
        }
        .is_lap());
    }
}
