//! Mode button task
//!
//! Each press of the mode button toggles between race mode and idle
//! mode. The rig boots idle.

use defmt::*;
use embassy_rp::gpio::Input;
use embassy_time::Timer;

use crate::channels::RACE_MODE;

/// Ignore further edges for this long after a press
const BUTTON_DEBOUNCE_MS: u64 = 50;

/// Mode button task
#[embassy_executor::task]
pub async fn button_task(mut button: Input<'static>) {
    info!("Button task started");

    let mut race_mode = false;

    loop {
        button.wait_for_rising_edge().await;

        race_mode = !race_mode;
        debug!("Mode button pressed, race mode = {}", race_mode);
        RACE_MODE.signal(race_mode);

        Timer::after_millis(BUTTON_DEBOUNCE_MS).await;
    }
}
