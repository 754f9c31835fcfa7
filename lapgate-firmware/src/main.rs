//! Lapgate - Race Timing Rig Firmware
//!
//! Main firmware binary for RP2040-based timing gates: a beam-break lap
//! timer, an ultrasonic speed trap and two seven-segment displays, all
//! wired according to `rig.toml`.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::gpio::{Flex, Input, Level as PinLevel, Output, Pull};
use embassy_rp::i2c::{self, I2c};
use embassy_time::Delay;
use {defmt_rtt as _, panic_probe as _};

use lapgate_core::config::{BeamConfig, DisplayConfig, RigConfig, I2C_SCL_PIN, I2C_SDA_PIN};
use lapgate_core::race::{RaceParts, RaceSettings, RaceSubsystem};
use lapgate_drivers::display::{Tm1637, Tm1637Config};
use lapgate_drivers::sensor::{BeamInput, Rangefinder};

use crate::config::load_config;
use crate::pins::{Bus, FlexLine, Level, PinBank, PinError, PushPull, UptimeClock};
use crate::tasks::race::Display;

mod channels;
mod config;
mod pins;
mod tasks;

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Lapgate firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = load_config();

    // Config validation pins the rangefinder to these two
    let mut i2c_config = i2c::Config::default();
    i2c_config.frequency = config.ranging.frequency_hz;
    let i2c = I2c::new_blocking(p.I2C0, p.PIN_17, p.PIN_16, i2c_config);
    info!(
        "I2C0 on GPIO {}/{} at {} Hz, rangefinder at {:#x}",
        I2C_SDA_PIN, I2C_SCL_PIN, config.ranging.frequency_hz, config.ranging.address
    );

    let mut bank = PinBank::new([
        Some(p.PIN_0.into()),
        Some(p.PIN_1.into()),
        Some(p.PIN_2.into()),
        Some(p.PIN_3.into()),
        Some(p.PIN_4.into()),
        Some(p.PIN_5.into()),
        Some(p.PIN_6.into()),
        Some(p.PIN_7.into()),
        Some(p.PIN_8.into()),
        Some(p.PIN_9.into()),
        Some(p.PIN_10.into()),
        Some(p.PIN_11.into()),
        Some(p.PIN_12.into()),
        Some(p.PIN_13.into()),
        Some(p.PIN_14.into()),
        Some(p.PIN_15.into()),
        // I2C0
        None,
        None,
        Some(p.PIN_18.into()),
        Some(p.PIN_19.into()),
        Some(p.PIN_20.into()),
        Some(p.PIN_21.into()),
        Some(p.PIN_22.into()),
        Some(p.PIN_23.into()),
        Some(p.PIN_24.into()),
        Some(p.PIN_25.into()),
        Some(p.PIN_26.into()),
        Some(p.PIN_27.into()),
        Some(p.PIN_28.into()),
        Some(p.PIN_29.into()),
    ]);

    let race = unwrap!(build_race(&config, &mut bank, Bus(i2c)));
    let button = Input::new(unwrap!(bank.take(config.button_pin)), Pull::Down);
    info!("Mode button on GPIO {}", config.button_pin);

    spawner
        .spawn(tasks::race_task(race, config.poll_interval_ms))
        .unwrap();
    spawner.spawn(tasks::button_task(button)).unwrap();

    info!("All tasks spawned, press the mode button to start racing");
}

/// Claim the rig's pins and assemble the race subsystem
fn build_race(
    config: &RigConfig,
    bank: &mut PinBank,
    bus: Bus,
) -> Result<tasks::Race, PinError> {
    let timer_display = build_display(&config.timer_display, bank)?;
    let lap_display = build_display(&config.lap_display, bank)?;
    let beam = build_beam(&config.beam, bank)?;
    let ranger = Rangefinder::from_config(bus, &config.ranging);

    info!(
        "Displays on GPIO {}/{} and {}/{}, beam on GPIO {}",
        config.timer_display.clock_pin,
        config.timer_display.data_pin,
        config.lap_display.clock_pin,
        config.lap_display.data_pin,
        config.beam.pin
    );

    Ok(RaceSubsystem::new(
        RaceSettings::from(config),
        RaceParts {
            beam,
            ranger,
            timer_display,
            lap_display,
            clock: UptimeClock,
        },
    ))
}

fn build_display(config: &DisplayConfig, bank: &mut PinBank) -> Result<Display, PinError> {
    let clk = Output::new(bank.take(config.clock_pin)?, PinLevel::High);
    let mut dio = Flex::new(bank.take(config.data_pin)?);
    dio.set_pull(Pull::Up);

    Ok(Tm1637::new(
        PushPull(clk),
        FlexLine(dio),
        Delay,
        Tm1637Config::from(config),
    ))
}

fn build_beam(config: &BeamConfig, bank: &mut PinBank) -> Result<BeamInput<Level>, PinError> {
    let pull = if config.pull_up { Pull::Up } else { Pull::None };
    let pin = Input::new(bank.take(config.pin)?, pull);
    Ok(BeamInput::idle_high(Level(pin)))
}
