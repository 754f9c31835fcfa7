//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in lapgate-core, written against the lapgate-hal pin and bus traits:
//!
//! - Two-wire seven-segment display controller (TM1637)
//! - I2C ultrasonic rangefinder
//! - Beam-break gate input

#![no_std]
#![deny(unsafe_code)]

pub mod display;
pub mod sensor;
