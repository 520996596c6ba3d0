use super::{Rgb, rgb_from_u32};
use crate::departure::DepartureStatus;

const GREEN: Rgb = rgb_from_u32(0x00_FF_00);
const AMBER: Rgb = rgb_from_u32(0xFF_A5_00);
const RED: Rgb = rgb_from_u32(0xFF_00_00);
const WHITE: Rgb = rgb_from_u32(0xFF_FF_FF);

/// Colors used by the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub on_time: Rgb,
    pub delayed: Rgb,
    pub cancelled: Rgb,
    pub clock: Rgb,
    pub header: Rgb,
    /// "API ERROR" banner
    pub error: Rgb,
    /// "NO DATA" banner
    pub notice: Rgb,
}

impl Palette {
    pub const fn status_color(&self, status: DepartureStatus) -> Rgb {
        match status {
            DepartureStatus::OnTime => self.on_time,
            DepartureStatus::Delayed => self.delayed,
            DepartureStatus::Cancelled => self.cancelled,
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            on_time: GREEN,
            delayed: AMBER,
            cancelled: RED,
            clock: WHITE,
            header: AMBER,
            error: RED,
            notice: AMBER,
        }
    }
}
