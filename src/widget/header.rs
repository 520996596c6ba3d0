use chrono::NaiveTime;
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;

use super::{Widget, draw_text};
use crate::color::Rgb;
use crate::layout::{BoardLayout, CLOCK_FONT, text_width};

/// Station code in the top-left corner, `HH:MM:SS` clock in the top-right
pub struct HeaderWidget<'a> {
    pub layout: &'a BoardLayout,
    pub station: &'a str,
    pub clock: NaiveTime,
    pub station_color: Rgb,
    pub clock_color: Rgb,
}

impl Widget for HeaderWidget<'_> {
    fn draw<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb888>,
    {
        let mut header = target.clipped(&self.layout.header());

        // Narrow panels give the whole band to the clock
        if !self.station.is_empty()
            && text_width(CLOCK_FONT, self.station) <= self.layout.station_capacity()
        {
            draw_text(
                &mut header,
                self.station,
                self.layout.station_origin(),
                CLOCK_FONT,
                self.station_color,
            )?;
        }

        let clock = self.clock.format("%H:%M:%S").to_string();
        draw_text(
            &mut header,
            &clock,
            self.layout.clock_origin(),
            CLOCK_FONT,
            self.clock_color,
        )
    }
}
