//! Race mode
//!
//! The subsystem that runs while the rig is timing: beam gate, lap timer,
//! speed estimation and both displays, advanced by one re-entrant step.

pub mod report;
pub mod subsystem;

pub use report::{RaceSnapshot, SpeedStats, StepReport};
pub use subsystem::{RaceParts, RaceSettings, RaceSubsystem};
