//! Speed estimation from rangefinder samples
//!
//! The rangefinder looks along the track. Consecutive distance readings
//! give an instantaneous speed; readings above the motion threshold are
//! treated as "vehicle present" and accumulated into a session average.
//! When the speed drops back below the threshold the session is
//! summarised once and cleared. The top speed survives every session.
//!
//! Reading the sensor is split into a trigger (select the distance
//! register) and a fetch (read the result) on separate steps so the
//! caller never waits for the sensor's conversion.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::time::{Instant, MICROS_PER_SECOND};

/// Minimum interval between range samples (400 ms)
pub const DEFAULT_SAMPLE_PERIOD_US: u32 = 400_000;

/// Time the sensor needs between register select and read (100 ms)
pub const DEFAULT_CONVERSION_US: u32 = 100_000;

/// Speeds above this count as a vehicle in motion (m/s)
pub const DEFAULT_MOTION_THRESHOLD_MPS: f32 = 0.5;

/// One distance reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpeedSample {
    /// Distance to the target in millimetres
    pub distance_mm: u16,
    /// When the reading was taken
    pub at: Instant,
}

impl SpeedSample {
    /// Create a sample
    pub const fn new(distance_mm: u16, at: Instant) -> Self {
        Self { distance_mm, at }
    }
}

/// Speed in m/s between two samples
///
/// Uses the magnitude of the distance change, so approaching and
/// receding targets both read positive. Zero elapsed time gives zero.
pub fn speed_mps(previous: SpeedSample, current: SpeedSample) -> f32 {
    let delta_us = current.at.micros_since(previous.at);
    if delta_us == 0 {
        return 0.0;
    }

    let delta_m = current.distance_mm.abs_diff(previous.distance_mm) as f32 / 1000.0;
    let delta_s = delta_us as f32 / MICROS_PER_SECOND as f32;
    delta_m / delta_s
}

/// Summary of one vehicle pass
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SessionSummary {
    /// Mean of the in-motion speeds (m/s)
    pub average_mps: f32,
    /// Top speed seen since power-up (m/s)
    pub top_mps: f32,
    /// Number of in-motion samples averaged
    pub samples: u32,
}

/// Running totals for the current pass
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SpeedSession {
    sum_mps: f32,
    count: u32,
    top_mps: f32,
}

impl SpeedSession {
    /// Add an in-motion speed
    fn record(&mut self, speed: f32) {
        self.sum_mps += speed;
        self.count += 1;
        if speed > self.top_mps {
            self.top_mps = speed;
        }
    }

    /// Close the pass; keeps the top speed
    fn finish(&mut self) -> Option<SessionSummary> {
        if self.count == 0 {
            return None;
        }

        let summary = SessionSummary {
            average_mps: self.sum_mps / self.count as f32,
            top_mps: self.top_mps,
            samples: self.count,
        };
        self.sum_mps = 0.0;
        self.count = 0;
        Some(summary)
    }

    /// Samples in the current pass
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Average of the current pass so far
    pub fn average_mps(&self) -> Option<f32> {
        if self.count == 0 {
            None
        } else {
            Some(self.sum_mps / self.count as f32)
        }
    }

    /// Highest speed ever recorded
    pub fn top_mps(&self) -> f32 {
        self.top_mps
    }
}

/// Result of pushing a sample into the estimator
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpeedEvent {
    /// Sample above the motion threshold
    Moving {
        /// Instantaneous speed (m/s)
        speed_mps: f32,
        /// Distance at this sample (mm)
        distance_mm: u16,
    },
    /// Vehicle left the field of view
    SessionEnded(SessionSummary),
}

/// Speed estimator
#[derive(Debug, Clone)]
pub struct SpeedEstimator {
    threshold_mps: f32,
    previous: Option<SpeedSample>,
    last_speed_mps: f32,
    session: SpeedSession,
    last_summary: Option<SessionSummary>,
}

impl Default for SpeedEstimator {
    fn default() -> Self {
        Self::new(DEFAULT_MOTION_THRESHOLD_MPS)
    }
}

impl SpeedEstimator {
    /// Create an estimator with the given motion threshold (m/s)
    pub fn new(threshold_mps: f32) -> Self {
        Self {
            threshold_mps,
            previous: None,
            last_speed_mps: 0.0,
            session: SpeedSession::default(),
            last_summary: None,
        }
    }

    /// Feed a new sample
    ///
    /// The first sample only primes the estimator.
    pub fn push(&mut self, sample: SpeedSample) -> Option<SpeedEvent> {
        let previous = self.previous.replace(sample)?;

        let speed = speed_mps(previous, sample);
        self.last_speed_mps = speed;

        if speed > self.threshold_mps {
            self.session.record(speed);
            return Some(SpeedEvent::Moving {
                speed_mps: speed,
                distance_mm: sample.distance_mm,
            });
        }

        let summary = self.session.finish()?;
        self.last_summary = Some(summary);
        Some(SpeedEvent::SessionEnded(summary))
    }

    /// Speed computed from the two most recent samples
    pub fn last_speed_mps(&self) -> f32 {
        self.last_speed_mps
    }

    /// Highest speed since power-up
    pub fn top_speed_mps(&self) -> f32 {
        self.session.top_mps()
    }

    /// Totals for the pass in progress
    pub fn session(&self) -> &SpeedSession {
        &self.session
    }

    /// Summary of the most recently finished pass
    pub fn last_summary(&self) -> Option<SessionSummary> {
        self.last_summary
    }

    /// Most recent sample
    pub fn previous_sample(&self) -> Option<SpeedSample> {
        self.previous
    }
}

/// Next ranging bus action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RangingAction {
    /// Select the distance register to start a measurement
    Trigger,
    /// Read the finished measurement
    Fetch,
}

/// Paces rangefinder access
///
/// Triggers at most once per sample period and fetches no sooner than
/// the conversion delay after a trigger. Both are soft minimums: if the
/// caller polls slowly, sampling simply slows down.
#[derive(Debug, Clone)]
pub struct SampleScheduler {
    period_us: u32,
    conversion_us: u32,
    last_trigger: Option<Instant>,
    awaiting_fetch: bool,
}

impl Default for SampleScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_PERIOD_US, DEFAULT_CONVERSION_US)
    }
}

impl SampleScheduler {
    /// Create a scheduler
    pub const fn new(period_us: u32, conversion_us: u32) -> Self {
        Self {
            period_us,
            conversion_us,
            last_trigger: None,
            awaiting_fetch: false,
        }
    }

    /// What, if anything, should be done on the bus now
    pub fn poll(&self, now: Instant) -> Option<RangingAction> {
        match self.last_trigger {
            Some(at) if self.awaiting_fetch => {
                now.has_elapsed(at, self.conversion_us).then_some(RangingAction::Fetch)
            }
            Some(at) => now.has_elapsed(at, self.period_us).then_some(RangingAction::Trigger),
            None => Some(RangingAction::Trigger),
        }
    }

    /// A measurement was started at `now`
    pub fn triggered(&mut self, now: Instant) {
        self.last_trigger = Some(now);
        self.awaiting_fetch = true;
    }

    /// The measurement was read
    pub fn fetched(&mut self) {
        self.awaiting_fetch = false;
    }

    /// Drop the measurement in flight; the next trigger waits a full period
    pub fn abandon(&mut self) {
        self.awaiting_fetch = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(t: u32) -> Instant {
        Instant::from_millis(t.into())
    }

    fn close(a: f32, b: f32) -> bool {
        let d = a - b;
        d < 1e-5 && d > -1e-5
    }

    #[test]
    fn test_speed_from_two_samples() {
        let a = SpeedSample::new(1000, ms(0));
        let b = SpeedSample::new(900, ms(500));
        assert_eq!(speed_mps(a, b), 0.2);
        // Receding target reads the same magnitude
        assert_eq!(speed_mps(b, SpeedSample::new(1000, ms(1000))), 0.2);
    }

    #[test]
    fn test_zero_delta_time_is_zero_speed() {
        let a = SpeedSample::new(1000, ms(7));
        let b = SpeedSample::new(100, ms(7));
        assert_eq!(speed_mps(a, b), 0.0);
    }

    #[test]
    fn test_first_sample_primes() {
        let mut est = SpeedEstimator::default();
        assert_eq!(est.push(SpeedSample::new(3000, ms(0))), None);
        assert_eq!(est.last_speed_mps(), 0.0);
        assert!(est.previous_sample().is_some());
    }

    #[test]
    fn test_slow_samples_are_not_a_session() {
        let mut est = SpeedEstimator::default();
        est.push(SpeedSample::new(1000, ms(0)));
        // 0.2 m/s is below threshold and there is no streak to close
        assert_eq!(est.push(SpeedSample::new(900, ms(500))), None);
        assert_eq!(est.session().count(), 0);
    }

    #[test]
    fn test_session_average_and_top_speed() {
        let mut est = SpeedEstimator::default();
        est.push(SpeedSample::new(3000, ms(0)));

        // 1 m/s then 2 m/s
        let e1 = est.push(SpeedSample::new(2600, ms(400)));
        assert!(matches!(e1, Some(SpeedEvent::Moving { .. })));
        est.push(SpeedSample::new(1800, ms(800)));
        assert_eq!(est.session().count(), 2);
        assert!(close(est.session().average_mps().unwrap_or(0.0), 1.5));

        // Vehicle gone: distance stays put
        let end = est.push(SpeedSample::new(1800, ms(1200)));
        match end {
            Some(SpeedEvent::SessionEnded(summary)) => {
                assert!(close(summary.average_mps, 1.5));
                assert!(close(summary.top_mps, 2.0));
                assert_eq!(summary.samples, 2);
            }
            other => panic!("expected session end, got {:?}", other),
        }
        assert_eq!(est.session().count(), 0);
        assert!(est.last_summary().is_some());

        // Reported only once
        assert_eq!(est.push(SpeedSample::new(1800, ms(1600))), None);
    }

    #[test]
    fn test_top_speed_survives_sessions() {
        let mut est = SpeedEstimator::default();
        est.push(SpeedSample::new(5000, ms(0)));
        est.push(SpeedSample::new(3800, ms(400))); // 3 m/s
        est.push(SpeedSample::new(3800, ms(800))); // end
        est.push(SpeedSample::new(3400, ms(1200))); // 1 m/s
        est.push(SpeedSample::new(3400, ms(1600))); // end

        assert!(close(est.top_speed_mps(), 3.0));
        let summary = est.last_summary().unwrap();
        assert!(close(summary.average_mps, 1.0));
        assert!(close(summary.top_mps, 3.0));
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let mut est = SpeedEstimator::new(0.5);
        est.push(SpeedSample::new(1000, ms(0)));
        // Exactly 0.5 m/s
        assert_eq!(est.push(SpeedSample::new(800, ms(400))), None);
    }

    #[test]
    fn test_scheduler_paces_trigger_and_fetch() {
        let mut sched = SampleScheduler::default();
        assert_eq!(sched.poll(ms(0)), Some(RangingAction::Trigger));
        sched.triggered(ms(0));

        assert_eq!(sched.poll(ms(50)), None);
        assert_eq!(sched.poll(ms(100)), Some(RangingAction::Fetch));
        sched.fetched();

        assert_eq!(sched.poll(ms(399)), None);
        assert_eq!(sched.poll(ms(400)), Some(RangingAction::Trigger));
    }

    #[test]
    fn test_scheduler_slow_polling_just_slows_sampling() {
        let mut sched = SampleScheduler::default();
        sched.triggered(ms(0));
        assert_eq!(sched.poll(ms(2_000)), Some(RangingAction::Fetch));
        sched.fetched();
        assert_eq!(sched.poll(ms(2_001)), Some(RangingAction::Trigger));
    }

    #[test]
    fn test_scheduler_abandon_waits_full_period() {
        let mut sched = SampleScheduler::default();
        sched.triggered(ms(10));
        sched.abandon();
        assert_eq!(sched.poll(ms(200)), None);
        assert_eq!(sched.poll(ms(410)), Some(RangingAction::Trigger));
    }
}
