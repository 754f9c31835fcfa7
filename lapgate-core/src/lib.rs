//! Board-agnostic core logic for the race-timing rig
//!
//! This crate contains all timing and display logic that does not depend
//! on specific hardware implementations:
//!
//! - Hardware abstraction traits (beam sensor, rangefinder, display, clock)
//! - Seven-segment codec and digit frames
//! - Debounced beam-break edge detection
//! - Lap timer state machine
//! - Speed estimation from range samples
//! - The race subsystem step that ties them together
//! - Configuration type definitions and parser

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod debounce;
pub mod frame;
pub mod race;
pub mod segment;
pub mod speed;
pub mod time;
pub mod timer;
pub mod traits;
