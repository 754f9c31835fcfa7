//! Lap timer state machine
//!
//! ```text
//!            break                      break (restart-on-lap)
//!   Idle ───────────▶ Running ──────────────┐
//!    ▲                   │  ▲               │
//!    │  break            │  └───────────────┘
//!    └─(pause-on-lap)────┘
//! ```
//!
//! Every break while running completes a lap. Whether the timer keeps
//! going for the next lap or stops and waits is a configuration choice.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::events::TimerEvent;
use super::lap_time::LapTime;
use crate::time::{Instant, MICROS_PER_SECOND};

/// What happens when a running lap is completed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LapPolicy {
    /// Start timing the next lap immediately from 00:00
    #[default]
    RestartOnLap,
    /// Stop with the finished time shown; the next break starts a new lap
    PauseOnLap,
}

/// Lap timer phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LapPhase {
    /// No lap in progress
    #[default]
    Idle,
    /// Accumulating elapsed time
    Running,
}

impl LapPhase {
    /// Phase after a beam break under the given policy
    pub fn on_break(self, policy: LapPolicy) -> Self {
        match (self, policy) {
            (LapPhase::Idle, _) => LapPhase::Running,
            (LapPhase::Running, LapPolicy::RestartOnLap) => LapPhase::Running,
            (LapPhase::Running, LapPolicy::PauseOnLap) => LapPhase::Idle,
        }
    }

    /// Check if time is being accumulated
    pub fn is_running(&self) -> bool {
        matches!(self, LapPhase::Running)
    }
}

/// Lap timer
///
/// Owns the elapsed time of the current lap, the anchor it is measured
/// against, and the last completed lap. The last lap only ever changes
/// on a lap completion (or an explicit [`LapTimer::reset`]); ticking and
/// rendering leave it untouched no matter how often they run.
#[derive(Debug, Clone)]
pub struct LapTimer {
    policy: LapPolicy,
    phase: LapPhase,
    elapsed: LapTime,
    /// Tick-reference timestamp, advanced in whole seconds
    anchor: Instant,
    last_lap: Option<LapTime>,
    laps_completed: u32,
}

impl Default for LapTimer {
    fn default() -> Self {
        Self::new(LapPolicy::default())
    }
}

impl LapTimer {
    /// Create an idle timer
    pub const fn new(policy: LapPolicy) -> Self {
        Self {
            policy,
            phase: LapPhase::Idle,
            elapsed: LapTime::ZERO,
            anchor: Instant::ZERO,
            last_lap: None,
            laps_completed: 0,
        }
    }

    /// Handle a debounced beam break
    pub fn on_beam_break(&mut self, now: Instant) -> TimerEvent {
        let event = match self.phase {
            LapPhase::Idle => {
                self.elapsed = LapTime::ZERO;
                TimerEvent::Started
            }
            LapPhase::Running => {
                let lap = self.elapsed;
                self.last_lap = Some(lap);
                self.laps_completed = self.laps_completed.wrapping_add(1);
                if self.policy == LapPolicy::RestartOnLap {
                    self.elapsed = LapTime::ZERO;
                }
                TimerEvent::LapCompleted {
                    lap,
                    count: self.laps_completed,
                }
            }
        };

        self.anchor = now;
        self.phase = self.phase.on_break(self.policy);
        event
    }

    /// Advance elapsed time up to `now`
    ///
    /// Adds one second per full second since the anchor, moving the anchor
    /// by exactly one second each time. Returns the number of seconds added.
    pub fn tick(&mut self, now: Instant) -> u32 {
        if !self.phase.is_running() {
            return 0;
        }

        let mut advanced = 0;
        while now.has_elapsed(self.anchor, MICROS_PER_SECOND) {
            self.anchor = self.anchor.add_micros(MICROS_PER_SECOND);
            self.elapsed.increment();
            advanced += 1;
        }
        advanced
    }

    /// Return to idle and forget all lap results
    pub fn reset(&mut self) {
        self.phase = LapPhase::Idle;
        self.elapsed = LapTime::ZERO;
        self.last_lap = None;
        self.laps_completed = 0;
    }

    /// Current phase
    pub fn phase(&self) -> LapPhase {
        self.phase
    }

    /// Check if the timer is running
    pub fn is_running(&self) -> bool {
        self.phase.is_running()
    }

    /// Elapsed time of the current lap
    pub fn elapsed(&self) -> LapTime {
        self.elapsed
    }

    /// Last completed lap, if any lap has finished
    pub fn last_lap(&self) -> Option<LapTime> {
        self.last_lap
    }

    /// Check if a completed lap time is available
    pub fn lap_time_valid(&self) -> bool {
        self.last_lap.is_some()
    }

    /// Number of laps completed since start or reset
    pub fn laps_completed(&self) -> u32 {
        self.laps_completed
    }
}
