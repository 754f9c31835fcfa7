//! Step reports and telemetry snapshots

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::debounce::Edge;
use crate::speed::{SessionSummary, SpeedEvent};
use crate::time::Instant;
use crate::timer::{LapPhase, LapTime, TimerEvent};
use crate::traits::SensorError;

/// What happened during one step
///
/// The subsystem does not log; the caller turns reports into log lines.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StepReport {
    /// Time the step ran
    pub at: Instant,
    /// Hardware was initialised on this step
    pub initialized: bool,
    /// Debounced beam edge
    pub edge: Option<Edge>,
    /// Lap timer transition
    pub timer: Option<TimerEvent>,
    /// Speed estimator output
    pub speed: Option<SpeedEvent>,
    /// Rangefinder failure; the sample was skipped
    pub sensor_error: Option<SensorError>,
}

impl StepReport {
    /// Check if nothing noteworthy happened
    pub fn is_quiet(&self) -> bool {
        !self.initialized
            && self.edge.is_none()
            && self.timer.is_none()
            && self.speed.is_none()
            && self.sensor_error.is_none()
    }
}

/// Speed figures for telemetry
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SpeedStats {
    /// Most recent instantaneous speed (m/s)
    pub last_mps: f32,
    /// Highest speed since power-up (m/s)
    pub top_mps: f32,
    /// Last finished pass
    pub last_session: Option<SessionSummary>,
}

/// Current values exposed to an external reporter
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RaceSnapshot {
    /// Lap timer phase
    pub phase: LapPhase,
    /// Running time of the current lap
    pub elapsed: LapTime,
    /// Last completed lap
    pub last_lap: Option<LapTime>,
    /// Laps completed since start or reset
    pub laps_completed: u32,
    /// Speed figures
    pub speed: SpeedStats,
}
