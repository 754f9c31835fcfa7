//! Lap timer
//!
//! Elapsed-time accumulation and the start/lap/reset state machine.
//! Time is counted in whole seconds against an anchor timestamp that is
//! advanced in exact one-second steps, so polling jitter never
//! accumulates into drift.

pub mod events;
pub mod lap_time;
pub mod machine;

pub use events::TimerEvent;
pub use lap_time::LapTime;
pub use machine::{LapPhase, LapPolicy, LapTimer};
