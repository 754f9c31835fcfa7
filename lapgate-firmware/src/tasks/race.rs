//! Race mode task
//!
//! Steps the race subsystem every poll interval while race mode is
//! active and turns its step reports into log lines. Leaving race mode
//! stops stepping; the subsystem keeps its state and picks up where it
//! left off when race mode returns.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_time::{Delay, Duration, Ticker};

use lapgate_core::race::{RaceSubsystem, StepReport};
use lapgate_core::speed::SpeedEvent;
use lapgate_core::timer::TimerEvent;
use lapgate_drivers::display::Tm1637;
use lapgate_drivers::sensor::{BeamInput, Rangefinder};

use crate::channels::RACE_MODE;
use crate::pins::{Bus, FlexLine, Level, PushPull, UptimeClock};

/// Display driver as wired on this board
pub type Display = Tm1637<PushPull, FlexLine, Delay>;

/// Race subsystem as wired on this board
pub type Race = RaceSubsystem<BeamInput<Level>, Rangefinder<Bus>, Display, Display, UptimeClock>;

/// Race mode task
#[embassy_executor::task]
pub async fn race_task(mut race: Race, poll_interval_ms: u32) {
    info!("Race task started, {} ms poll interval", poll_interval_ms);

    let mut ticker = Ticker::every(Duration::from_millis(poll_interval_ms as u64));
    let mut active = false;

    loop {
        if !active {
            active = RACE_MODE.wait().await;
            if active {
                info!("Entering race mode");
                ticker.reset();
            }
            continue;
        }

        match select(ticker.next(), RACE_MODE.wait()).await {
            Either::First(_) => {
                let report = race.step();
                if !report.is_quiet() {
                    log_report(&report);
                }
                if report.timer.is_some_and(|e| e.is_lap()) {
                    debug!("{}", race.snapshot());
                }
            }
            Either::Second(mode) => {
                active = mode;
                if !active {
                    info!("Entering idle mode");
                }
            }
        }
    }
}

fn log_report(report: &StepReport) {
    if report.initialized {
        info!("Race hardware initialized");
    }

    match report.timer {
        Some(TimerEvent::Started) => info!("Timer started"),
        Some(TimerEvent::LapCompleted { lap, count }) => {
            info!("Lap {} completed in {}", count, lap)
        }
        None => {}
    }

    match report.speed {
        Some(SpeedEvent::Moving {
            speed_mps,
            distance_mm,
        }) => debug!("Speed {} m/s at {} mm", speed_mps, distance_mm),
        Some(SpeedEvent::SessionEnded(summary)) => info!(
            "Pass over: average {} m/s, top {} m/s, {} samples",
            summary.average_mps, summary.top_mps, summary.samples
        ),
        None => {}
    }

    if let Some(e) = report.sensor_error {
        warn!("Rangefinder read failed: {}", e);
    }
}
