//! Race subsystem
//!
//! Owns every piece of race-mode state together with the hardware it
//! drives. The mode dispatcher calls [`RaceSubsystem::step`] once per
//! poll interval; each call runs to completion without waiting on the
//! sensors.

use crate::config::RigConfig;
use crate::debounce::{EdgeDetector, DEFAULT_DEBOUNCE_US};
use crate::frame::DigitFrame;
use crate::speed::{
    RangingAction, SampleScheduler, SpeedEstimator, SpeedEvent, SpeedSample,
    DEFAULT_CONVERSION_US, DEFAULT_MOTION_THRESHOLD_MPS, DEFAULT_SAMPLE_PERIOD_US,
};
use crate::time::Instant;
use crate::timer::{LapPolicy, LapTimer};
use crate::traits::{BeamSensor, Clock, RangeSensor, SegmentDisplay, SensorError};

use super::report::{RaceSnapshot, SpeedStats, StepReport};

/// Timing parameters for the race subsystem
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RaceSettings {
    /// Beam debounce window (µs)
    pub debounce_us: u32,
    /// What a lap does to the running timer
    pub lap_policy: LapPolicy,
    /// Minimum interval between range samples (µs)
    pub sample_period_us: u32,
    /// Wait between range trigger and fetch (µs)
    pub conversion_us: u32,
    /// Motion threshold (m/s)
    pub motion_threshold_mps: f32,
}

impl Default for RaceSettings {
    fn default() -> Self {
        Self {
            debounce_us: DEFAULT_DEBOUNCE_US,
            lap_policy: LapPolicy::RestartOnLap,
            sample_period_us: DEFAULT_SAMPLE_PERIOD_US,
            conversion_us: DEFAULT_CONVERSION_US,
            motion_threshold_mps: DEFAULT_MOTION_THRESHOLD_MPS,
        }
    }
}

impl From<&RigConfig> for RaceSettings {
    fn from(config: &RigConfig) -> Self {
        Self {
            debounce_us: config.beam.debounce_us,
            lap_policy: config.lap_policy,
            sample_period_us: config.ranging.sample_period_us,
            conversion_us: config.ranging.conversion_us,
            motion_threshold_mps: config.ranging.motion_threshold_mps,
        }
    }
}

/// Hardware handed to the subsystem
pub struct RaceParts<B, R, T, L, C> {
    /// Beam-break gate
    pub beam: B,
    /// Rangefinder
    pub ranger: R,
    /// Running-time display
    pub timer_display: T,
    /// Last-lap display
    pub lap_display: L,
    /// Monotonic clock
    pub clock: C,
}

/// Race-mode state and hardware
pub struct RaceSubsystem<B, R, T, L, C> {
    parts: RaceParts<B, R, T, L, C>,
    initialized: bool,
    edges: EdgeDetector,
    timer: LapTimer,
    speed: SpeedEstimator,
    scheduler: SampleScheduler,
}

impl<B, R, T, L, C> RaceSubsystem<B, R, T, L, C>
where
    B: BeamSensor,
    R: RangeSensor,
    T: SegmentDisplay,
    L: SegmentDisplay,
    C: Clock,
{
    /// Create the subsystem; no hardware is touched until the first step
    pub fn new(settings: RaceSettings, parts: RaceParts<B, R, T, L, C>) -> Self {
        Self {
            parts,
            initialized: false,
            edges: EdgeDetector::new(settings.debounce_us),
            timer: LapTimer::new(settings.lap_policy),
            speed: SpeedEstimator::new(settings.motion_threshold_mps),
            scheduler: SampleScheduler::new(settings.sample_period_us, settings.conversion_us),
        }
    }

    /// Run one poll cycle
    ///
    /// Initialises the hardware on the first call, then: beam, lap timer,
    /// ranging, render.
    pub fn step(&mut self) -> StepReport {
        let now = self.parts.clock.now();
        let mut report = StepReport {
            at: now,
            ..Default::default()
        };

        if !self.initialized {
            self.initialize(now);
            report.initialized = true;
        }

        // Whole seconds up to now belong to the lap that may end below
        self.timer.tick(now);

        let clear = self.parts.beam.is_clear();
        if let Some(edge) = self.edges.update(clear, now) {
            report.edge = Some(edge);
            if edge.is_break() {
                report.timer = Some(self.timer.on_beam_break(now));
            }
        }

        match self.poll_ranging(now) {
            Ok(event) => report.speed = event,
            Err(e) => report.sensor_error = Some(e),
        }

        self.render();
        report
    }

    fn initialize(&mut self, now: Instant) {
        self.parts.beam.init();
        self.parts.timer_display.init();
        self.parts.lap_display.init();

        let clear = self.parts.beam.is_clear();
        self.edges.prime(clear, now);
        self.initialized = true;
    }

    fn poll_ranging(&mut self, now: Instant) -> Result<Option<SpeedEvent>, SensorError> {
        match self.scheduler.poll(now) {
            Some(RangingAction::Trigger) => {
                // A failed trigger still waits out a full period
                self.scheduler.triggered(now);
                if let Err(e) = self.parts.ranger.trigger() {
                    self.scheduler.abandon();
                    return Err(e);
                }
                Ok(None)
            }
            Some(RangingAction::Fetch) => {
                self.scheduler.fetched();
                let distance_mm = self.parts.ranger.fetch_mm()?;
                Ok(self.speed.push(SpeedSample::new(distance_mm, now)))
            }
            None => Ok(None),
        }
    }

    fn render(&mut self) {
        let running = DigitFrame::from(self.timer.elapsed());
        let last = self
            .timer
            .last_lap()
            .map_or(DigitFrame::ZERO_TIME, DigitFrame::from);

        self.parts.timer_display.show(&running);
        self.parts.lap_display.show(&last);
    }

    /// Current values for telemetry
    pub fn snapshot(&self) -> RaceSnapshot {
        RaceSnapshot {
            phase: self.timer.phase(),
            elapsed: self.timer.elapsed(),
            last_lap: self.timer.last_lap(),
            laps_completed: self.timer.laps_completed(),
            speed: SpeedStats {
                last_mps: self.speed.last_speed_mps(),
                top_mps: self.speed.top_speed_mps(),
                last_session: self.speed.last_summary(),
            },
        }
    }

    /// Stop the timer and clear the lap history
    ///
    /// Hardware stays initialised and the top speed is kept.
    pub fn reset(&mut self) {
        self.timer.reset();
    }

    /// Check if the hardware has been initialised
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Lap timer state
    pub fn timer(&self) -> &LapTimer {
        &self.timer
    }

    /// Speed estimator state
    pub fn speed(&self) -> &SpeedEstimator {
        &self.speed
    }
}
