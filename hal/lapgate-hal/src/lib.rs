//! Lapgate Hardware Abstraction Layer
//!
//! This crate defines the hardware abstraction traits the timing rig
//! drivers are written against. Chip-specific glue (the RP2040 firmware)
//! implements them for real peripherals; tests implement them with
//! recording mocks.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  lapgate-firmware (RP2040 / Embassy)    │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  lapgate-drivers (TM1637, rangefinder)  │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  lapgate-hal (this crate - traits)      │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`], [`gpio::InputPin`], [`gpio::FlexPin`] - Digital I/O
//! - [`i2c::I2cBus`] - I2C bus operations

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod i2c;

// Re-export key traits at crate root for convenience
pub use gpio::{FlexPin, InputPin, OutputPin};
pub use i2c::I2cBus;
