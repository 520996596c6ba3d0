use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;

use super::{Widget, draw_text};
use crate::color::Rgb;
use crate::layout::{BoardLayout, ROW_FONT};

pub const API_ERROR_LINES: [&str; 2] = ["API ERROR", "Check network"];
pub const NO_DATA_LINES: [&str; 2] = ["NO DATA", "No trains"];

/// Two-line message filling the departure area
pub struct BannerWidget<'a> {
    pub layout: &'a BoardLayout,
    pub lines: [&'a str; 2],
    pub color: Rgb,
}

impl Widget for BannerWidget<'_> {
    fn draw<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb888>,
    {
        let mut body = target.clipped(&self.layout.body());
        for (line, origin) in self.lines.iter().zip(self.layout.banner_origins()) {
            draw_text(&mut body, line, origin, ROW_FONT, self.color)?;
        }
        Ok(())
    }
}
