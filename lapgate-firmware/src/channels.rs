//! Inter-task communication channels
//!
//! Defines the static signals used for communication between Embassy tasks.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

/// Requested mode from the button task: `true` = race, `false` = idle
pub static RACE_MODE: Signal<CriticalSectionRawMutex, bool> = Signal::new();
