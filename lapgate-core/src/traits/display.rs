//! Seven-segment display trait

use crate::frame::DigitFrame;

/// Maximum display brightness level
pub const MAX_BRIGHTNESS: u8 = 7;

/// A four-digit seven-segment display with a centre colon
///
/// Writes are fire-and-forget: the displays on this rig have no
/// read-back, so there is nothing to report if a write goes unheard.
pub trait SegmentDisplay {
    /// Prepare the lines and switch the display on
    ///
    /// Called once before the first [`show`](SegmentDisplay::show).
    fn init(&mut self);

    /// Render one frame
    fn show(&mut self, frame: &DigitFrame);

    /// Switch the display on at the given brightness (0-7)
    fn set_brightness(&mut self, brightness: u8);
}
