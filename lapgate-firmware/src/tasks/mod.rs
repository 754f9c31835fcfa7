//! Embassy async tasks
//!
//! Each task runs independently and communicates via signals.

pub mod button;
pub mod race;

pub use button::button_task;
pub use race::{race_task, Race};
